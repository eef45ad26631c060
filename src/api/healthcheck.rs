use actix_web::{get, HttpResponse};

use crate::api::responses::ApiResponse;

#[get("")]
pub async fn healthcheck_view() -> HttpResponse {
    ApiResponse::ok("OK", "Health check passed").into_response()
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::Value as JsonValue;
    use super::*;

    #[actix_web::test]
    async fn test_healthcheck() {
        let app = test::init_service(
            App::new().service(web::scope("/api").service(healthcheck_view))
        ).await;
        let request = test::TestRequest::get().uri("/api").to_request();
        let value: JsonValue = test::call_and_read_body_json(&app, request).await;
        assert_eq!(value["success"], true);
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["message"], "OK");
        assert_eq!(value["data"], "Health check passed");
    }
}
