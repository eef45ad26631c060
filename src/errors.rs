use actix_web::{
    error::ResponseError,
    http::StatusCode,
    HttpResponse,
    HttpResponseBuilder,
};
use serde::Serialize;

use buddyscript_models::database::DatabaseError;

use crate::media_host::MediaHostError;

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

#[derive(thiserror::Error, Debug)]
pub enum HttpError {
    #[error(transparent)]
    ActixError(#[from] actix_web::Error),

    #[error("database error")]
    DatabaseError(#[source] DatabaseError),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    ValidationErrorAuto(#[from] ValidationError),

    #[error("validation failed")]
    ValidationErrors(Vec<String>),

    #[error("{0}")]
    AuthError(&'static str),

    #[error("{0}")]
    PermissionError(&'static str),

    #[error("{0} not found")]
    NotFoundError(&'static str),

    #[error("{0}")]
    ConflictError(String),

    #[error("media host error")]
    MediaHostError(#[from] MediaHostError),

    #[error("{0}")]
    InternalError(&'static str),
}

impl From<DatabaseError> for HttpError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(name) => Self::NotFoundError(name),
            DatabaseError::AlreadyExists(name) => Self::ConflictError(
                format!("{} already exists", name),
            ),
            _ => Self::DatabaseError(error),
        }
    }
}

#[derive(Serialize)]
struct ErrorInfo {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl ResponseError for HttpError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = if status_code.is_server_error() {
            match std::error::Error::source(self) {
                Some(source) => log::error!("{}: {}", self, source),
                None => log::error!("{}", self),
            };
            "internal error".to_string()
        } else {
            self.to_string()
        };
        let errors = match self {
            Self::ValidationErrors(errors) => Some(errors.clone()),
            _ => None,
        };
        let error_info = ErrorInfo { success: false, message, errors };
        HttpResponseBuilder::new(status_code).json(error_info)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::ActixError(error) =>
                error.as_response_error().status_code(),
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::ValidationErrorAuto(_) => StatusCode::BAD_REQUEST,
            Self::ValidationErrors(_) => StatusCode::BAD_REQUEST,
            Self::AuthError(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionError(_) => StatusCode::FORBIDDEN,
            Self::NotFoundError(_) => StatusCode::NOT_FOUND,
            Self::ConflictError(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use serde_json::{json, Value as JsonValue};
    use super::*;

    async fn response_json(error: HttpError) -> (StatusCode, JsonValue) {
        let response = error.error_response();
        let status = response.status();
        let body = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[actix_web::test]
    async fn test_database_error_mapping() {
        let (status, value) =
            response_json(DatabaseError::NotFound("post").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value, json!({ "success": false, "message": "post not found" }));

        let (status, _) =
            response_json(DatabaseError::AlreadyExists("reaction").into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_validation_errors_list() {
        let error = HttpError::ValidationErrors(vec!["email is invalid".to_string()]);
        let (status, value) = response_json(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["errors"], json!(["email is invalid"]));
    }

    #[actix_web::test]
    async fn test_internal_error_hides_details() {
        let error = HttpError::InternalError("failed to sign token");
        let (status, value) = response_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["message"], "internal error");
    }
}
