use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use buddyscript_models::comments::queries::{
    count_comments_by_post,
    count_replies_by_comment,
};
use buddyscript_models::comments::types::Comment;
use buddyscript_models::database::{DatabaseClient, DatabaseError};
use buddyscript_models::posts::types::Post;
use buddyscript_models::reactions::queries::get_reaction_breakdowns;
use buddyscript_models::reactions::types::TargetType;
use buddyscript_models::users::queries::get_authors;

use super::comments::types::ApiComment;
use super::posts::types::ApiPost;

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

/// Adds authors, reactions and comment counts to posts.
/// Lookups are independent and run concurrently on the same connection.
pub async fn hydrate_posts(
    db_client: &impl DatabaseClient,
    current_user_id: &Uuid,
    posts: Vec<Post>,
) -> Result<Vec<ApiPost>, DatabaseError> {
    if posts.is_empty() {
        return Ok(vec![]);
    };
    let post_ids: Vec<Uuid> = posts.iter().map(|post| post.id).collect();
    let author_ids = unique_ids(posts.iter().map(|post| post.author_id));
    let (authors, mut breakdowns, comment_counts) = tokio::try_join!(
        get_authors(db_client, &author_ids),
        get_reaction_breakdowns(db_client, &TargetType::Post, &post_ids),
        count_comments_by_post(db_client, &post_ids),
    )?;
    let api_posts = posts.into_iter()
        .map(|post| {
            let author = authors.get(&post.author_id);
            let reactions = breakdowns.remove(&post.id).unwrap_or_default();
            let comment_count = comment_counts.get(&post.id).copied().unwrap_or(0);
            ApiPost::from_post(post, author, reactions, comment_count, current_user_id)
        })
        .collect();
    Ok(api_posts)
}

pub async fn hydrate_post(
    db_client: &impl DatabaseClient,
    current_user_id: &Uuid,
    post: Post,
) -> Result<ApiPost, DatabaseError> {
    let mut api_posts = hydrate_posts(db_client, current_user_id, vec![post]).await?;
    api_posts.pop().ok_or(DatabaseError::NotFound("post"))
}

/// Adds authors and reactions to comments.
/// Reply counts are added only to root comments.
pub async fn hydrate_comments(
    db_client: &impl DatabaseClient,
    current_user_id: &Uuid,
    comments: Vec<Comment>,
    with_reply_count: bool,
) -> Result<Vec<ApiComment>, DatabaseError> {
    if comments.is_empty() {
        return Ok(vec![]);
    };
    let comment_ids: Vec<Uuid> = comments.iter().map(|comment| comment.id).collect();
    let author_ids = unique_ids(comments.iter().map(|comment| comment.author_id));
    let get_reply_counts = async {
        if with_reply_count {
            count_replies_by_comment(db_client, &comment_ids).await
        } else {
            Ok(HashMap::new())
        }
    };
    let (authors, mut breakdowns, reply_counts) = tokio::try_join!(
        get_authors(db_client, &author_ids),
        get_reaction_breakdowns(db_client, &TargetType::Comment, &comment_ids),
        get_reply_counts,
    )?;
    let api_comments = comments.into_iter()
        .map(|comment| {
            let author = authors.get(&comment.author_id);
            let reactions = breakdowns.remove(&comment.id).unwrap_or_default();
            let reply_count = with_reply_count
                .then(|| reply_counts.get(&comment.id).copied().unwrap_or(0));
            ApiComment::from_comment(comment, author, reactions, reply_count, current_user_id)
        })
        .collect();
    Ok(api_comments)
}

pub async fn hydrate_comment(
    db_client: &impl DatabaseClient,
    current_user_id: &Uuid,
    comment: Comment,
    with_reply_count: bool,
) -> Result<ApiComment, DatabaseError> {
    let mut api_comments = hydrate_comments(
        db_client,
        current_user_id,
        vec![comment],
        with_reply_count,
    ).await?;
    api_comments.pop().ok_or(DatabaseError::NotFound("comment"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use serial_test::serial;
    use buddyscript_models::comments::queries::create_comment;
    use buddyscript_models::comments::types::CommentCreateData;
    use buddyscript_models::database::test_utils::create_test_database;
    use buddyscript_models::posts::queries::create_post;
    use buddyscript_models::posts::types::PostCreateData;
    use buddyscript_models::reactions::queries::react;
    use buddyscript_models::reactions::types::ReactionType;
    use buddyscript_models::users::queries::create_user;
    use buddyscript_models::users::types::{User, UserCreateData};
    use super::*;

    async fn create_test_user(db_client: &impl DatabaseClient, email: &str) -> User {
        let user_data = UserCreateData {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        };
        create_user(db_client, user_data).await.unwrap()
    }

    async fn create_test_comment(
        db_client: &impl DatabaseClient,
        author_id: &Uuid,
        post_id: &Uuid,
        parent_id: Option<Uuid>,
    ) -> Comment {
        let comment_data = CommentCreateData {
            post_id: *post_id,
            content: "comment".to_string(),
            parent_id,
        };
        create_comment(db_client, author_id, comment_data).await.unwrap()
    }

    #[test]
    fn test_unique_ids_keeps_order() {
        let id_1 = Uuid::new_v4();
        let id_2 = Uuid::new_v4();
        let ids = unique_ids(vec![id_1, id_2, id_1, id_2].into_iter());
        assert_eq!(ids, vec![id_1, id_2]);
    }

    #[tokio::test]
    #[serial]
    async fn test_hydrate_posts() {
        let db_client = &mut create_test_database().await;
        let author = create_test_user(db_client, "author@example.com").await;
        let reader = create_test_user(db_client, "reader@example.com").await;
        let post_data = PostCreateData {
            content: "post".to_string(),
            ..Default::default()
        };
        let post = create_post(db_client, &author.id, post_data).await.unwrap();
        let comment = create_test_comment(db_client, &reader.id, &post.id, None).await;
        create_test_comment(db_client, &author.id, &post.id, Some(comment.id)).await;
        react(db_client, &reader.id, &TargetType::Post, &post.id, &ReactionType::Love)
            .await.unwrap();

        let api_posts = hydrate_posts(db_client, &reader.id, vec![post]).await.unwrap();
        assert_eq!(api_posts.len(), 1);
        let value = serde_json::to_value(&api_posts[0]).unwrap();
        assert_eq!(value["author"]["id"], json!(author.id));
        assert_eq!(value["commentCount"], 2);
        assert_eq!(value["totalReactions"], 1);
        assert_eq!(value["userReaction"], "love");
        assert_eq!(value["reactions"]["love"]["count"], 1);
        assert_eq!(value["reactions"]["love"]["userIds"], json!([reader.id]));
    }

    #[tokio::test]
    #[serial]
    async fn test_hydrate_comments_and_replies() {
        let db_client = &mut create_test_database().await;
        let user = create_test_user(db_client, "user@example.com").await;
        let post_data = PostCreateData {
            content: "post".to_string(),
            ..Default::default()
        };
        let post = create_post(db_client, &user.id, post_data).await.unwrap();
        let comment = create_test_comment(db_client, &user.id, &post.id, None).await;
        let reply = create_test_comment(db_client, &user.id, &post.id, Some(comment.id)).await;
        react(db_client, &user.id, &TargetType::Comment, &reply.id, &ReactionType::Haha)
            .await.unwrap();

        let api_comments = hydrate_comments(
            db_client,
            &user.id,
            vec![comment],
            true,
        ).await.unwrap();
        let value = serde_json::to_value(&api_comments).unwrap();
        assert_eq!(value[0]["replyCount"], 1);
        assert_eq!(value[0]["totalReactions"], 0);
        assert_eq!(value[0]["userReaction"], serde_json::Value::Null);

        let api_replies = hydrate_comments(
            db_client,
            &user.id,
            vec![reply.clone()],
            false,
        ).await.unwrap();
        let value = serde_json::to_value(&api_replies).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["id"], json!(reply.id));
        assert_eq!(value[0]["parentId"], json!(reply.parent_id));
        assert!(value[0].get("replyCount").is_none());
        assert_eq!(value[0]["totalReactions"], 1);
        assert_eq!(value[0]["userReaction"], "haha");
        assert_eq!(value[0]["reactions"]["haha"]["count"], 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_hydrate_empty_list() {
        let db_client = &create_test_database().await;
        let api_comments = hydrate_comments(db_client, &Uuid::new_v4(), vec![], true)
            .await.unwrap();
        assert!(api_comments.is_empty());
    }
}
