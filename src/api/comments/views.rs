use actix_web::{get, post, web, HttpRequest, HttpResponse, Scope};
use uuid::Uuid;

use buddyscript_config::Config;
use buddyscript_models::comments::queries::{
    create_comment,
    get_comment_by_id,
    get_replies,
    get_root_comments,
};
use buddyscript_models::comments::types::{Comment, CommentCreateData};
use buddyscript_models::database::{get_database_client, DbPool};

use crate::api::auth::current_user::get_current_user;
use crate::api::hydrate::{hydrate_comment, hydrate_comments};
use crate::api::pagination::{PageInfo, PageQueryParams};
use crate::api::posts::helpers::get_visible_post;
use crate::api::responses::ApiResponse;
use crate::errors::HttpError;
use crate::validators::posts::clean_content;
use super::types::{CommentData, CommentPage};

/// Replies are only allowed on root comments
fn check_reply_parent(parent: &Comment) -> Result<(), HttpError> {
    if parent.is_reply() {
        return Err(HttpError::ValidationError(
            "replies to replies are not allowed".to_string(),
        ));
    };
    Ok(())
}

#[post("/post/{post_id}")]
async fn create_comment_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    post_id: web::Path<Uuid>,
    data: web::Json<CommentData>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let content = clean_content(&data.content, "comment content cannot be empty")?;
    let post = get_visible_post(db_client, &current_user.id, &post_id).await?;
    let comment_data = CommentCreateData {
        post_id: post.id,
        content,
        parent_id: None,
    };
    let comment = create_comment(db_client, &current_user.id, comment_data).await?;
    let api_comment = hydrate_comment(db_client, &current_user.id, comment, true).await?;
    Ok(ApiResponse::created("Comment added", api_comment).into_response())
}

#[get("/post/{post_id}")]
async fn get_comments_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    post_id: web::Path<Uuid>,
    query_params: web::Query<PageQueryParams>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let post = get_visible_post(db_client, &current_user.id, &post_id).await?;
    let page_limits = &config.limits.pages;
    let limit = query_params.limit(
        page_limits.comments_page_size,
        page_limits.comments_page_max_size,
    );
    let page = get_root_comments(
        db_client,
        &post.id,
        query_params.cursor,
        limit,
    ).await?;
    let page_info = PageInfo::from_page(&page, |comment| comment.created_at);
    let comments = hydrate_comments(
        db_client,
        &current_user.id,
        page.items,
        true,
    ).await?;
    let comment_page = CommentPage {
        comments,
        next_cursor: page_info.next_cursor,
        has_more: page_info.has_more,
    };
    Ok(ApiResponse::ok("Comments fetched successfully", comment_page).into_response())
}

#[post("/reply/{comment_id}")]
async fn create_reply_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    comment_id: web::Path<Uuid>,
    data: web::Json<CommentData>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let content = clean_content(&data.content, "reply content cannot be empty")?;
    let parent = get_comment_by_id(db_client, &comment_id).await?;
    let post = get_visible_post(db_client, &current_user.id, &parent.post_id).await?;
    check_reply_parent(&parent)?;
    let comment_data = CommentCreateData {
        post_id: post.id,
        content,
        parent_id: Some(parent.id),
    };
    let reply = create_comment(db_client, &current_user.id, comment_data).await?;
    let api_reply = hydrate_comment(db_client, &current_user.id, reply, false).await?;
    Ok(ApiResponse::created("Reply added", api_reply).into_response())
}

#[get("/reply/{comment_id}")]
async fn get_replies_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let parent = get_comment_by_id(db_client, &comment_id).await?;
    get_visible_post(db_client, &current_user.id, &parent.post_id).await?;
    let replies = get_replies(db_client, &parent.id).await?;
    let replies = hydrate_comments(db_client, &current_user.id, replies, false).await?;
    Ok(ApiResponse::ok("Replies fetched successfully", replies).into_response())
}

pub fn comment_api_scope() -> Scope {
    web::scope("/comments")
        .service(create_comment_view)
        .service(get_comments_view)
        .service(create_reply_view)
        .service(get_replies_view)
}
