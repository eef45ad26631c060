use chrono::{DateTime, Utc};
use postgres_types::FromSql;
use uuid::Uuid;

#[derive(Clone, FromSql)]
#[postgres(name = "comment")]
pub struct DbComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Comment = DbComment;

impl DbComment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

pub struct CommentCreateData {
    pub post_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
}
