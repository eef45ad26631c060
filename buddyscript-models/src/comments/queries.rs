use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use buddyscript_utils::id::new_uuid;

use crate::database::{DatabaseClient, DatabaseError};
use crate::pagination::{overfetch_limit, Page};
use super::types::{Comment, CommentCreateData, DbComment};

pub async fn create_comment(
    db_client: &impl DatabaseClient,
    author_id: &Uuid,
    data: CommentCreateData,
) -> Result<Comment, DatabaseError> {
    let comment_id = new_uuid();
    // Parent must belong to the same post (composite foreign key)
    let row = db_client.query_one(
        "
        INSERT INTO comment (
            id,
            post_id,
            author_id,
            content,
            parent_id
        )
        VALUES ($1, $2, $3, $4, $5)
        RETURNING comment
        ",
        &[
            &comment_id,
            &data.post_id,
            &author_id,
            &data.content,
            &data.parent_id,
        ],
    ).await?;
    let comment: DbComment = row.try_get("comment")?;
    Ok(comment)
}

pub async fn get_comment_by_id(
    db_client: &impl DatabaseClient,
    comment_id: &Uuid,
) -> Result<Comment, DatabaseError> {
    let maybe_row = db_client.query_opt(
        "
        SELECT comment
        FROM comment
        WHERE id = $1
        ",
        &[&comment_id],
    ).await?;
    let row = maybe_row.ok_or(DatabaseError::NotFound("comment"))?;
    let comment: DbComment = row.try_get("comment")?;
    Ok(comment)
}

/// Root comments of a post, newest first
pub async fn get_root_comments(
    db_client: &impl DatabaseClient,
    post_id: &Uuid,
    created_before: Option<DateTime<Utc>>,
    limit: u16,
) -> Result<Page<Comment>, DatabaseError> {
    let rows = db_client.query(
        "
        SELECT comment
        FROM comment
        WHERE
            post_id = $1
            AND parent_id IS NULL
            AND ($2::timestamptz IS NULL OR created_at < $2)
        ORDER BY created_at DESC, id DESC
        LIMIT $3
        ",
        &[&post_id, &created_before, &overfetch_limit(limit)],
    ).await?;
    let comments: Vec<Comment> = rows.iter()
        .map(|row| row.try_get("comment"))
        .collect::<Result<_, _>>()?;
    Ok(Page::from_overfetched(comments, limit))
}

/// All replies to a comment, oldest first
pub async fn get_replies(
    db_client: &impl DatabaseClient,
    parent_id: &Uuid,
) -> Result<Vec<Comment>, DatabaseError> {
    let rows = db_client.query(
        "
        SELECT comment
        FROM comment
        WHERE parent_id = $1
        ORDER BY created_at ASC, id ASC
        ",
        &[&parent_id],
    ).await?;
    let comments = rows.iter()
        .map(|row| row.try_get("comment"))
        .collect::<Result<_, _>>()?;
    Ok(comments)
}

/// Number of comments (including replies) on each post
pub async fn count_comments_by_post(
    db_client: &impl DatabaseClient,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, DatabaseError> {
    let rows = db_client.query(
        "
        SELECT post_id, count(*) AS comment_count
        FROM comment
        WHERE post_id = ANY($1)
        GROUP BY post_id
        ",
        &[&post_ids],
    ).await?;
    let counts = rows.iter()
        .map(|row| Ok((row.try_get("post_id")?, row.try_get("comment_count")?)))
        .collect::<Result<_, tokio_postgres::Error>>()?;
    Ok(counts)
}

/// Number of replies to each comment
pub async fn count_replies_by_comment(
    db_client: &impl DatabaseClient,
    comment_ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, DatabaseError> {
    let rows = db_client.query(
        "
        SELECT parent_id, count(*) AS reply_count
        FROM comment
        WHERE parent_id = ANY($1)
        GROUP BY parent_id
        ",
        &[&comment_ids],
    ).await?;
    let counts = rows.iter()
        .map(|row| Ok((row.try_get("parent_id")?, row.try_get("reply_count")?)))
        .collect::<Result<_, tokio_postgres::Error>>()?;
    Ok(counts)
}
