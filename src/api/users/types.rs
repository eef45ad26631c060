use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use buddyscript_models::users::types::{Author, ImageRef, User};

use crate::errors::{HttpError, ValidationError};
use crate::validators::users::{
    validate_email,
    validate_first_name,
    validate_last_name,
    validate_password,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiImage {
    pub url: String,
    pub public_id: String,
}

impl From<ImageRef> for ApiImage {
    fn from(image: ImageRef) -> Self {
        Self { url: image.url, public_id: image.public_id }
    }
}

fn get_avatar(user: &User) -> Option<ApiImage> {
    match (&user.avatar_url, &user.avatar_public_id) {
        (Some(url), Some(public_id)) => Some(ApiImage {
            url: url.clone(),
            public_id: public_id.clone(),
        }),
        _ => None,
    }
}

/// User account without secrets
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: Option<ApiImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            avatar: get_avatar(user),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Author summary attached to posts and comments
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAuthor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

impl From<&Author> for ApiAuthor {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            avatar_url: author.avatar_url.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn collect_errors(results: Vec<Result<(), ValidationError>>) -> Result<(), HttpError> {
    let errors: Vec<String> = results.into_iter()
        .filter_map(|result| result.err())
        .map(|error| error.to_string())
        .collect();
    if !errors.is_empty() {
        return Err(HttpError::ValidationErrors(errors));
    };
    Ok(())
}

impl RegistrationData {
    /// Validate and clean
    pub fn clean(&mut self) -> Result<(), HttpError> {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = self.email.trim().to_string();
        if [&self.first_name, &self.last_name, &self.email, &self.password]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return Err(ValidationError("all fields are required").into());
        };
        collect_errors(vec![
            validate_first_name(&self.first_name),
            validate_last_name(&self.last_name),
            validate_email(&self.email),
            validate_password(&self.password),
        ])
    }
}

#[derive(Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenData {
    pub refresh_token: Option<String>,
}

/// Optional profile changes, blank values are ignored
#[derive(Default)]
pub struct ProfileUpdateData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ProfileUpdateData {
    pub fn validate(&self) -> Result<(), HttpError> {
        let mut results = vec![];
        if let Some(ref first_name) = self.first_name {
            results.push(validate_first_name(first_name));
        };
        if let Some(ref last_name) = self.last_name {
            results.push(validate_last_name(last_name));
        };
        if let Some(ref email) = self.email {
            results.push(validate_email(email));
        };
        if let Some(ref password) = self.password {
            results.push(validate_password(password));
        };
        collect_errors(results)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: ApiUser,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct CurrentUserData {
    pub user: ApiUser,
}
