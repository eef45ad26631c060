use actix_web::{
    error::{Error, JsonPayloadError, PathError, QueryPayloadError},
    HttpRequest,
    HttpResponse,
};

use crate::errors::HttpError;

/// Convert JSON payload deserialization errors into validation errors
pub fn json_error_handler(error: JsonPayloadError, _: &HttpRequest) -> Error {
    match error {
        JsonPayloadError::Deserialize(de_error) => {
            HttpError::ValidationError(de_error.to_string()).into()
        },
        JsonPayloadError::ContentType => {
            HttpError::ValidationError("expected JSON body".to_string()).into()
        },
        other_error => other_error.into(),
    }
}

pub fn query_error_handler(error: QueryPayloadError, _: &HttpRequest) -> Error {
    match error {
        QueryPayloadError::Deserialize(de_error) => {
            HttpError::ValidationError(de_error.to_string()).into()
        },
        other_error => other_error.into(),
    }
}

pub fn path_error_handler(error: PathError, _: &HttpRequest) -> Error {
    match error {
        PathError::Deserialize(_) => {
            HttpError::ValidationError("invalid identifier".to_string()).into()
        },
        other_error => other_error.into(),
    }
}

pub async fn not_found_handler() -> Result<HttpResponse, HttpError> {
    Err(HttpError::NotFoundError("route"))
}
