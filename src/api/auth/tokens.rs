use chrono::Utc;
use jsonwebtoken::{
    decode,
    encode,
    errors::ErrorKind,
    Algorithm,
    DecodingKey,
    EncodingKey,
    Header,
    Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use buddyscript_config::AuthConfig;
use buddyscript_models::users::types::User;

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,

    #[error("failed to sign token")]
    SigningError(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub sub: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn sign_token(claims: &impl Serialize, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(TOKEN_ALGORITHM),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    ).map_err(TokenError::SigningError)
}

fn verify_token<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    let validation = Validation::new(TOKEN_ALGORITHM);
    let token_data = decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ).map_err(|error| match error.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;
    Ok(token_data.claims)
}

pub fn create_token_pair(
    auth_config: &AuthConfig,
    user: &User,
) -> Result<TokenPair, TokenError> {
    let issued_at = Utc::now().timestamp();
    let access_claims = AccessClaims {
        sub: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        iat: issued_at,
        exp: issued_at + auth_config.access_token_expiry,
    };
    let refresh_claims = RefreshClaims {
        sub: user.id,
        iat: issued_at,
        exp: issued_at + auth_config.refresh_token_expiry,
    };
    let token_pair = TokenPair {
        access_token: sign_token(&access_claims, &auth_config.access_token_secret)?,
        refresh_token: sign_token(&refresh_claims, &auth_config.refresh_token_secret)?,
    };
    Ok(token_pair)
}

pub fn verify_access_token(
    auth_config: &AuthConfig,
    token: &str,
) -> Result<AccessClaims, TokenError> {
    verify_token(token, &auth_config.access_token_secret)
}

pub fn verify_refresh_token(
    auth_config: &AuthConfig,
    token: &str,
) -> Result<RefreshClaims, TokenError> {
    verify_token(token, &auth_config.refresh_token_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token_pair() {
        let auth_config = AuthConfig::for_test();
        let user = User::default();
        let token_pair = create_token_pair(&auth_config, &user).unwrap();

        let access_claims =
            verify_access_token(&auth_config, &token_pair.access_token).unwrap();
        assert_eq!(access_claims.sub, user.id);
        assert_eq!(access_claims.email, user.email);
        assert_eq!(
            access_claims.exp - access_claims.iat,
            auth_config.access_token_expiry,
        );
        let refresh_claims =
            verify_refresh_token(&auth_config, &token_pair.refresh_token).unwrap();
        assert_eq!(refresh_claims.sub, user.id);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let auth_config = AuthConfig::for_test();
        let user = User::default();
        let token_pair = create_token_pair(&auth_config, &user).unwrap();
        let result = verify_access_token(&auth_config, &token_pair.refresh_token);
        assert!(matches!(result, Err(TokenError::Invalid)));
        let result = verify_refresh_token(&auth_config, &token_pair.access_token);
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token() {
        let auth_config = AuthConfig::for_test();
        let issued_at = Utc::now().timestamp() - 3600;
        let claims = RefreshClaims {
            sub: Uuid::new_v4(),
            iat: issued_at,
            exp: issued_at + 60,
        };
        let token = sign_token(&claims, &auth_config.refresh_token_secret).unwrap();
        let result = verify_refresh_token(&auth_config, &token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }
}
