use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use buddyscript_models::comments::types::Comment;
use buddyscript_models::reactions::types::ReactionBreakdown;
use buddyscript_models::users::types::Author;

use crate::api::reactions::types::ReactionSummary;
use crate::api::users::types::ApiAuthor;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author: Option<ApiAuthor>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub reaction_summary: ReactionSummary,
    // Not present on replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<i64>,
}

impl ApiComment {
    pub fn from_comment(
        comment: Comment,
        author: Option<&Author>,
        reactions: ReactionBreakdown,
        reply_count: Option<i64>,
        current_user_id: &Uuid,
    ) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author: author.map(ApiAuthor::from),
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            reaction_summary: ReactionSummary::new(reactions, current_user_id),
            reply_count,
        }
    }
}

#[derive(Deserialize)]
pub struct CommentData {
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<ApiComment>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use buddyscript_models::reactions::types::ReactionType;
    use super::*;

    fn create_api_comment(reply_count: Option<i64>) -> ApiComment {
        let user_id = Uuid::new_v4();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            author_id: user_id,
            content: "test".to_string(),
            parent_id: reply_count.is_none().then(Uuid::new_v4),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut reactions = ReactionBreakdown::default();
        reactions.set_group(&ReactionType::Care, vec![user_id]);
        ApiComment::from_comment(comment, None, reactions, reply_count, &user_id)
    }

    #[test]
    fn test_serialize_reply_without_reply_count() {
        let api_comment = create_api_comment(None);
        let value = serde_json::to_value(api_comment).unwrap();
        assert!(value.get("replyCount").is_none());
        assert!(value["parentId"].is_string());
        assert_eq!(value["totalReactions"], 1);
        assert_eq!(value["userReaction"], "care");
        for reaction_type in ReactionType::ALL {
            let group = &value["reactions"][reaction_type.as_str()];
            assert!(group["count"].is_number());
            assert!(group["userIds"].is_array());
        };
        assert_eq!(value["reactions"]["care"]["userIds"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_serialize_root_comment_with_reply_count() {
        let api_comment = create_api_comment(Some(0));
        let value = serde_json::to_value(api_comment).unwrap();
        assert_eq!(value["replyCount"], json!(0));
        assert_eq!(value["parentId"], serde_json::Value::Null);
        assert_eq!(value["author"], serde_json::Value::Null);
    }
}
