use actix_multipart::Multipart;
use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse, Scope};
use uuid::Uuid;

use buddyscript_config::Config;
use buddyscript_models::database::{get_database_client, DbPool};
use buddyscript_models::posts::queries::{
    create_post,
    delete_post,
    get_feed,
    update_post,
};
use buddyscript_models::posts::types::{PostCreateData, PostUpdateData, Visibility};

use crate::api::auth::current_user::get_current_user;
use crate::api::hydrate::{hydrate_post, hydrate_posts};
use crate::api::pagination::{PageInfo, PageQueryParams};
use crate::api::responses::{ApiResponse, Empty};
use crate::api::uploads::read_multipart_form;
use crate::errors::HttpError;
use crate::media_host::{delete_image, upload_image};
use crate::validators::posts::clean_content;
use super::helpers::{get_own_post, get_visible_post, parse_visibility};
use super::types::FeedPage;

#[post("")]
async fn create_post_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let form = read_multipart_form(payload, "image", &config.limits.media).await?;
    let content = clean_content(
        form.raw_text("content").unwrap_or_default(),
        "post content cannot be empty",
    )?;
    let visibility = match form.text("visibility") {
        Some(value) => parse_visibility(&value)?,
        None => Visibility::Public,
    };
    let image = match form.file {
        Some(file) => Some(upload_image(
            &config.media_host,
            file.data,
            &file.file_name,
            &file.media_type,
        ).await?),
        None => None,
    };
    let post_data = PostCreateData { content, image, visibility };
    let post = create_post(db_client, &current_user.id, post_data).await?;
    log::info!("created post {}", post.id);
    let api_post = hydrate_post(db_client, &current_user.id, post).await?;
    Ok(ApiResponse::created("Post created successfully", api_post).into_response())
}

#[get("/feed")]
async fn feed_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    query_params: web::Query<PageQueryParams>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let page_limits = &config.limits.pages;
    let limit = query_params.limit(page_limits.feed_page_size, page_limits.feed_page_max_size);
    let page = get_feed(
        db_client,
        &current_user.id,
        query_params.cursor,
        limit,
    ).await?;
    let page_info = PageInfo::from_page(&page, |post| post.created_at);
    let posts = hydrate_posts(db_client, &current_user.id, page.items).await?;
    let feed_page = FeedPage {
        posts,
        next_cursor: page_info.next_cursor,
        has_more: page_info.has_more,
    };
    Ok(ApiResponse::ok("Feed fetched successfully", feed_page).into_response())
}

#[get("/{post_id}")]
async fn get_post_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let post = get_visible_post(db_client, &current_user.id, &post_id).await?;
    let api_post = hydrate_post(db_client, &current_user.id, post).await?;
    Ok(ApiResponse::ok("Post fetched successfully", api_post).into_response())
}

#[patch("/{post_id}")]
async fn update_post_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    post_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let post = get_own_post(
        db_client,
        &current_user.id,
        &post_id,
        "you can only update your own posts",
    ).await?;
    let form = read_multipart_form(payload, "image", &config.limits.media).await?;
    let content = match form.raw_text("content") {
        Some(content) => Some(clean_content(content, "post content cannot be empty")?),
        None => None,
    };
    let visibility = match form.text("visibility") {
        Some(value) => Some(parse_visibility(&value)?),
        None => None,
    };
    let image = match form.file {
        Some(file) => {
            // Old image is deleted first
            if let Some(ref public_id) = post.image_public_id {
                let is_deleted = delete_image(&config.media_host, public_id).await?;
                if !is_deleted {
                    return Err(HttpError::InternalError("failed to delete old image"));
                };
            };
            let image = upload_image(
                &config.media_host,
                file.data,
                &file.file_name,
                &file.media_type,
            ).await?;
            Some(image)
        },
        None => None,
    };
    let post_data = PostUpdateData { content, image, visibility };
    let post = update_post(db_client, &post.id, post_data).await?;
    let api_post = hydrate_post(db_client, &current_user.id, post).await?;
    Ok(ApiResponse::ok("Post updated successfully", api_post).into_response())
}

#[delete("/{post_id}")]
async fn delete_post_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &mut **get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    get_own_post(
        db_client,
        &current_user.id,
        &post_id,
        "you can only delete your own posts",
    ).await?;
    let deleted_post = delete_post(db_client, &post_id).await?;
    log::info!("deleted post {}", deleted_post.id);
    if let Some(ref public_id) = deleted_post.image_public_id {
        match delete_image(&config.media_host, public_id).await {
            Ok(true) => (),
            Ok(false) => log::warn!("image {} was not deleted", public_id),
            Err(error) => log::warn!("failed to delete image {}: {}", public_id, error),
        };
    };
    Ok(ApiResponse::ok("Post deleted successfully", Empty {}).into_response())
}

pub fn post_api_scope() -> Scope {
    web::scope("/posts")
        .service(create_post_view)
        // Routes with static paths must go before /{post_id}
        .service(feed_view)
        .service(get_post_view)
        .service(update_post_view)
        .service(delete_post_view)
}
