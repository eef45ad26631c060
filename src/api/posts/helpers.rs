use std::str::FromStr;

use uuid::Uuid;

use buddyscript_models::database::DatabaseClient;
use buddyscript_models::posts::helpers::can_view_post;
use buddyscript_models::posts::queries::get_post_by_id;
use buddyscript_models::posts::types::{Post, Visibility};

use crate::errors::HttpError;

/// Fetches post and checks that current user can see it
pub async fn get_visible_post(
    db_client: &impl DatabaseClient,
    current_user_id: &Uuid,
    post_id: &Uuid,
) -> Result<Post, HttpError> {
    let post = get_post_by_id(db_client, post_id).await?;
    if !can_view_post(current_user_id, &post) {
        return Err(HttpError::PermissionError("this post is private"));
    };
    Ok(post)
}

/// Fetches post and checks that current user is its author
pub async fn get_own_post(
    db_client: &impl DatabaseClient,
    current_user_id: &Uuid,
    post_id: &Uuid,
    error_message: &'static str,
) -> Result<Post, HttpError> {
    let post = get_post_by_id(db_client, post_id).await?;
    if &post.author_id != current_user_id {
        return Err(HttpError::PermissionError(error_message));
    };
    Ok(post)
}

pub fn parse_visibility(value: &str) -> Result<Visibility, HttpError> {
    Visibility::from_str(value)
        .map_err(|_| HttpError::ValidationError("invalid visibility value".to_string()))
}
