use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    HttpRequest,
};

use buddyscript_config::Config;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

fn build_cookie(
    config: &Config,
    name: &'static str,
    value: String,
    max_age: i64,
) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .secure(config.is_production())
        .same_site(if config.is_production() { SameSite::None } else { SameSite::Lax })
        .max_age(Duration::seconds(max_age))
        .finish()
}

pub fn access_token_cookie(config: &Config, token: String) -> Cookie<'static> {
    build_cookie(config, ACCESS_TOKEN_COOKIE, token, config.auth.access_token_expiry)
}

pub fn refresh_token_cookie(config: &Config, token: String) -> Cookie<'static> {
    build_cookie(config, REFRESH_TOKEN_COOKIE, token, config.auth.refresh_token_expiry)
}

/// Cookies that overwrite and expire both token cookies
pub fn removal_cookies(config: &Config) -> [Cookie<'static>; 2] {
    let mut access_cookie = build_cookie(config, ACCESS_TOKEN_COOKIE, "".to_string(), 0);
    access_cookie.make_removal();
    let mut refresh_cookie = build_cookie(config, REFRESH_TOKEN_COOKIE, "".to_string(), 0);
    refresh_cookie.make_removal();
    [access_cookie, refresh_cookie]
}

pub fn get_cookie_value(request: &HttpRequest, name: &str) -> Option<String> {
    request.cookie(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use buddyscript_config::Environment;
    use super::*;

    #[test]
    fn test_token_cookies() {
        let config = Config::for_test("http://127.0.0.1:9000");
        let cookie = access_token_cookie(&config, "token".to_string());
        assert_eq!(cookie.name(), "accessToken");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(
            cookie.max_age(),
            Some(Duration::seconds(config.auth.access_token_expiry)),
        );
    }

    #[test]
    fn test_token_cookies_production() {
        let mut config = Config::for_test("http://127.0.0.1:9000");
        config.environment = Environment::Production;
        let cookie = refresh_token_cookie(&config, "token".to_string());
        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }

    #[test]
    fn test_removal_cookies() {
        let config = Config::for_test("http://127.0.0.1:9000");
        let [access_cookie, refresh_cookie] = removal_cookies(&config);
        assert_eq!(access_cookie.value(), "");
        assert_eq!(refresh_cookie.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn test_get_cookie_value() {
        let request = TestRequest::default()
            .cookie(Cookie::new("refreshToken", "abc"))
            .to_http_request();
        assert_eq!(get_cookie_value(&request, REFRESH_TOKEN_COOKIE).as_deref(), Some("abc"));
        assert_eq!(get_cookie_value(&request, ACCESS_TOKEN_COOKIE), None);
    }
}
