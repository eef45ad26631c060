use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use buddyscript_models::posts::types::Post;
use buddyscript_models::reactions::types::ReactionBreakdown;
use buddyscript_models::users::types::Author;

use crate::api::reactions::types::ReactionSummary;
use crate::api::users::types::{ApiAuthor, ApiImage};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPost {
    pub id: Uuid,
    pub author: Option<ApiAuthor>,
    pub content: String,
    pub image: Option<ApiImage>,
    pub visibility: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub reaction_summary: ReactionSummary,
    pub comment_count: i64,
}

impl ApiPost {
    pub fn from_post(
        post: Post,
        author: Option<&Author>,
        reactions: ReactionBreakdown,
        comment_count: i64,
        current_user_id: &Uuid,
    ) -> Self {
        Self {
            id: post.id,
            author: author.map(ApiAuthor::from),
            image: post.image().map(ApiImage::from),
            visibility: post.visibility.as_str(),
            content: post.content,
            created_at: post.created_at,
            updated_at: post.updated_at,
            reaction_summary: ReactionSummary::new(reactions, current_user_id),
            comment_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub posts: Vec<ApiPost>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}
