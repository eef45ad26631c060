use chrono::{DateTime, Utc};
use uuid::Uuid;

use buddyscript_utils::id::new_uuid;

use crate::database::{DatabaseClient, DatabaseError};
use crate::pagination::{overfetch_limit, Page};
use crate::reactions::types::TargetType;
use super::types::{DbPost, Post, PostCreateData, PostUpdateData, Visibility};

pub async fn create_post(
    db_client: &impl DatabaseClient,
    author_id: &Uuid,
    data: PostCreateData,
) -> Result<Post, DatabaseError> {
    let post_id = new_uuid();
    let (image_url, image_public_id) = match data.image {
        Some(image) => (Some(image.url), Some(image.public_id)),
        None => (None, None),
    };
    let row = db_client.query_one(
        "
        INSERT INTO post (
            id,
            author_id,
            content,
            image_url,
            image_public_id,
            visibility
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING post
        ",
        &[
            &post_id,
            &author_id,
            &data.content,
            &image_url,
            &image_public_id,
            &data.visibility,
        ],
    ).await?;
    let post: DbPost = row.try_get("post")?;
    Ok(post)
}

pub async fn get_post_by_id(
    db_client: &impl DatabaseClient,
    post_id: &Uuid,
) -> Result<Post, DatabaseError> {
    let maybe_row = db_client.query_opt(
        "
        SELECT post
        FROM post
        WHERE id = $1
        ",
        &[&post_id],
    ).await?;
    let row = maybe_row.ok_or(DatabaseError::NotFound("post"))?;
    let post: DbPost = row.try_get("post")?;
    Ok(post)
}

/// Public posts and posts of the current user, newest first
pub async fn get_feed(
    db_client: &impl DatabaseClient,
    current_user_id: &Uuid,
    created_before: Option<DateTime<Utc>>,
    limit: u16,
) -> Result<Page<Post>, DatabaseError> {
    let statement = format!(
        "
        SELECT post
        FROM post
        WHERE
            (visibility = {visibility_public} OR author_id = $1)
            AND ($2::timestamptz IS NULL OR created_at < $2)
        ORDER BY created_at DESC, id DESC
        LIMIT $3
        ",
        visibility_public=i16::from(&Visibility::Public),
    );
    let rows = db_client.query(
        statement.as_str(),
        &[&current_user_id, &created_before, &overfetch_limit(limit)],
    ).await?;
    let posts: Vec<Post> = rows.iter()
        .map(|row| row.try_get("post"))
        .collect::<Result<_, _>>()?;
    Ok(Page::from_overfetched(posts, limit))
}

pub async fn update_post(
    db_client: &impl DatabaseClient,
    post_id: &Uuid,
    data: PostUpdateData,
) -> Result<Post, DatabaseError> {
    let (image_url, image_public_id) = match data.image {
        Some(image) => (Some(image.url), Some(image.public_id)),
        None => (None, None),
    };
    let maybe_row = db_client.query_opt(
        "
        UPDATE post
        SET
            content = COALESCE($2, content),
            image_url = COALESCE($3, image_url),
            image_public_id = COALESCE($4, image_public_id),
            visibility = COALESCE($5, visibility),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        RETURNING post
        ",
        &[
            &post_id,
            &data.content,
            &image_url,
            &image_public_id,
            &data.visibility,
        ],
    ).await?;
    let row = maybe_row.ok_or(DatabaseError::NotFound("post"))?;
    let post: DbPost = row.try_get("post")?;
    Ok(post)
}

/// Deletes post together with its comments and all reactions
/// on the post and on its comments.
/// Returns the deleted post so its image can be removed from the media host.
pub async fn delete_post(
    db_client: &mut impl DatabaseClient,
    post_id: &Uuid,
) -> Result<Post, DatabaseError> {
    let transaction = db_client.transaction().await?;
    transaction.execute(
        "
        DELETE FROM reaction
        WHERE
            (target_type = $1 AND target_id = $3)
            OR (
                target_type = $2
                AND target_id IN (SELECT id FROM comment WHERE post_id = $3)
            )
        ",
        &[&TargetType::Post, &TargetType::Comment, &post_id],
    ).await?;
    // Comments are removed by cascade
    let maybe_row = transaction.query_opt(
        "
        DELETE FROM post
        WHERE id = $1
        RETURNING post
        ",
        &[&post_id],
    ).await?;
    let row = maybe_row.ok_or(DatabaseError::NotFound("post"))?;
    let post: DbPost = row.try_get("post")?;
    transaction.commit().await?;
    Ok(post)
}

#[cfg(all(test, feature = "test-utils"))]
pub(crate) mod tests {
    use serial_test::serial;
    use crate::database::test_utils::create_test_database;
    use crate::users::queries::tests::create_test_user;
    use super::*;

    pub async fn create_test_post(
        db_client: &impl DatabaseClient,
        author_id: &Uuid,
        visibility: Visibility,
    ) -> Post {
        let post_data = PostCreateData {
            content: "test post".to_string(),
            visibility,
            ..Default::default()
        };
        create_post(db_client, author_id, post_data).await.unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_create_and_get_post() {
        let db_client = &create_test_database().await;
        let author = create_test_user(db_client, "author@example.com").await;
        let post = create_test_post(db_client, &author.id, Visibility::Public).await;
        let fetched = get_post_by_id(db_client, &post.id).await.unwrap();
        assert_eq!(fetched.content, "test post");
        assert_eq!(fetched.author_id, author.id);
        assert_eq!(fetched.visibility, Visibility::Public);
        assert!(fetched.image().is_none());
    }

    #[tokio::test]
    #[serial]
    async fn test_get_feed_visibility() {
        let db_client = &create_test_database().await;
        let user_1 = create_test_user(db_client, "one@example.com").await;
        let user_2 = create_test_user(db_client, "two@example.com").await;
        let public_post = create_test_post(db_client, &user_1.id, Visibility::Public).await;
        let private_post = create_test_post(db_client, &user_1.id, Visibility::Private).await;

        let page = get_feed(db_client, &user_2.id, None, 20).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, public_post.id);

        let page = get_feed(db_client, &user_1.id, None, 20).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, private_post.id);
        assert!(!page.has_more);
    }

    #[tokio::test]
    #[serial]
    async fn test_get_feed_cursor() {
        let db_client = &create_test_database().await;
        let user = create_test_user(db_client, "user@example.com").await;
        for _ in 0..5 {
            create_test_post(db_client, &user.id, Visibility::Public).await;
        };
        let page_1 = get_feed(db_client, &user.id, None, 2).await.unwrap();
        assert_eq!(page_1.items.len(), 2);
        assert!(page_1.has_more);
        let cursor = page_1.next_cursor(|post| post.created_at);
        let page_2 = get_feed(db_client, &user.id, cursor, 2).await.unwrap();
        assert_eq!(page_2.items.len(), 2);
        assert!(page_2.items.iter()
            .all(|post| post.created_at < page_1.items[1].created_at));
        let cursor = page_2.next_cursor(|post| post.created_at);
        let page_3 = get_feed(db_client, &user.id, cursor, 2).await.unwrap();
        assert_eq!(page_3.items.len(), 1);
        assert!(!page_3.has_more);
    }

    #[tokio::test]
    #[serial]
    async fn test_update_post() {
        let db_client = &create_test_database().await;
        let user = create_test_user(db_client, "user@example.com").await;
        let post = create_test_post(db_client, &user.id, Visibility::Public).await;
        let update_data = PostUpdateData {
            visibility: Some(Visibility::Private),
            ..Default::default()
        };
        let updated = update_post(db_client, &post.id, update_data).await.unwrap();
        assert_eq!(updated.content, post.content);
        assert_eq!(updated.visibility, Visibility::Private);
    }

    #[tokio::test]
    #[serial]
    async fn test_delete_post() {
        let db_client = &mut create_test_database().await;
        let user = create_test_user(db_client, "user@example.com").await;
        let post = create_test_post(db_client, &user.id, Visibility::Public).await;
        let deleted = delete_post(db_client, &post.id).await.unwrap();
        assert_eq!(deleted.id, post.id);
        let error = get_post_by_id(db_client, &post.id).await.err().unwrap();
        assert!(matches!(error, DatabaseError::NotFound("post")));
        let error = delete_post(db_client, &post.id).await.err().unwrap();
        assert!(matches!(error, DatabaseError::NotFound("post")));
    }
}
