use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use serde::Serialize;

/// Success envelope
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    success: bool,
    status_code: u16,
    message: &'static str,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: &'static str, data: T) -> Self {
        Self {
            success: status.as_u16() < 400,
            status_code: status.as_u16(),
            message,
            data,
        }
    }

    pub fn ok(message: &'static str, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data)
    }

    /// Response builder with matching status, for attaching cookies
    pub fn builder(&self) -> HttpResponseBuilder {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::OK);
        HttpResponseBuilder::new(status)
    }

    pub fn into_response(self) -> HttpResponse {
        self.builder().json(self)
    }
}

/// Empty object for responses without data
#[derive(Serialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    #[test]
    fn test_serialize_envelope() {
        let response = ApiResponse::created("Comment added", json!({ "id": 1 }));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({
            "success": true,
            "statusCode": 201,
            "message": "Comment added",
            "data": { "id": 1 },
        }));
    }
}
