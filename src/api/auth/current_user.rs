use actix_web::{http::header::Header, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};

use buddyscript_config::AuthConfig;
use buddyscript_models::database::{DatabaseClient, DatabaseError};
use buddyscript_models::users::{
    queries::get_user_by_id,
    types::User,
};

use crate::errors::HttpError;
use super::cookies::{get_cookie_value, ACCESS_TOKEN_COOKIE};
use super::tokens::{verify_access_token, TokenError};

/// Reads access token from cookie or from Authorization header
fn get_access_token(request: &HttpRequest) -> Option<String> {
    get_cookie_value(request, ACCESS_TOKEN_COOKIE).or_else(|| {
        Authorization::<Bearer>::parse(request)
            .ok()
            .map(|auth| auth.into_scheme().token().to_string())
    })
}

pub async fn get_current_user(
    db_client: &impl DatabaseClient,
    auth_config: &AuthConfig,
    request: &HttpRequest,
) -> Result<User, HttpError> {
    let token = get_access_token(request)
        .ok_or(HttpError::AuthError("access token is missing"))?;
    let claims = verify_access_token(auth_config, &token)
        .map_err(|error| match error {
            TokenError::Expired => HttpError::AuthError("access token has expired"),
            _ => HttpError::AuthError("access token is invalid"),
        })?;
    let user = get_user_by_id(db_client, &claims.sub).await.map_err(|error| {
        match error {
            DatabaseError::NotFound(_) => {
                HttpError::AuthError("access token is invalid")
            },
            other_error => other_error.into(),
        }
    })?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use actix_web::cookie::Cookie;
    use super::*;

    #[test]
    fn test_get_access_token_from_header() {
        let request = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(get_access_token(&request).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_get_access_token_cookie_first() {
        let request = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "from-cookie"))
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();
        assert_eq!(get_access_token(&request).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_get_access_token_missing() {
        let request = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(get_access_token(&request), None);
    }
}
