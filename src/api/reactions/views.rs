use std::str::FromStr;

use actix_web::{delete, get, post, web, HttpRequest, HttpResponse, Scope};
use uuid::Uuid;

use buddyscript_config::Config;
use buddyscript_models::comments::queries::get_comment_by_id;
use buddyscript_models::database::{get_database_client, DatabaseClient, DbPool};
use buddyscript_models::reactions::queries::{
    get_reaction_breakdown,
    react,
    remove_reaction,
};
use buddyscript_models::reactions::types::{ReactionType, TargetType};

use crate::api::auth::current_user::get_current_user;
use crate::api::posts::helpers::get_visible_post;
use crate::api::responses::{ApiResponse, Empty};
use crate::errors::HttpError;
use super::types::{
    ReactionData,
    ReactionResult,
    ReactionSummary,
    ReactionTargetData,
    TargetReactions,
};

fn parse_target_type(value: &str) -> Result<TargetType, HttpError> {
    TargetType::from_str(value)
        .map_err(|_| HttpError::ValidationError("invalid target type".to_string()))
}

fn parse_reaction_type(value: Option<&str>) -> Result<ReactionType, HttpError> {
    match value {
        Some(value) => ReactionType::from_str(value)
            .map_err(|_| HttpError::ValidationError("invalid reaction type".to_string())),
        None => Ok(ReactionType::Like),
    }
}

/// Checks that target exists and its post is visible to current user
async fn check_target_access(
    db_client: &impl DatabaseClient,
    current_user_id: &Uuid,
    target_type: &TargetType,
    target_id: &Uuid,
) -> Result<(), HttpError> {
    let post_id = match target_type {
        TargetType::Post => *target_id,
        TargetType::Comment => {
            let comment = get_comment_by_id(db_client, target_id).await?;
            comment.post_id
        },
    };
    get_visible_post(db_client, current_user_id, &post_id).await?;
    Ok(())
}

#[post("")]
async fn react_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    data: web::Json<ReactionData>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &mut **get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let target_type = parse_target_type(&data.target_type)?;
    let reaction_type = parse_reaction_type(data.reaction_type.as_deref())?;
    check_target_access(
        db_client,
        &current_user.id,
        &target_type,
        &data.target_id,
    ).await?;
    let action = react(
        db_client,
        &current_user.id,
        &target_type,
        &data.target_id,
        &reaction_type,
    ).await?;
    let breakdown = get_reaction_breakdown(
        db_client,
        &target_type,
        &data.target_id,
    ).await?;
    let result = ReactionResult {
        action: action.as_str(),
        target_type,
        target_id: data.target_id,
        summary: ReactionSummary::new(breakdown, &current_user.id),
    };
    let message = ReactionResult::message(&action);
    Ok(ApiResponse::ok(message, result).into_response())
}

#[delete("")]
async fn remove_reaction_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    data: web::Json<ReactionTargetData>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let target_type = parse_target_type(&data.target_type)?;
    check_target_access(
        db_client,
        &current_user.id,
        &target_type,
        &data.target_id,
    ).await?;
    remove_reaction(
        db_client,
        &current_user.id,
        &target_type,
        &data.target_id,
    ).await?;
    Ok(ApiResponse::ok("Reaction removed", Empty {}).into_response())
}

#[get("/{target_type}/{target_id}")]
async fn get_reactions_view(
    config: web::Data<Config>,
    db_pool: web::Data<DbPool>,
    request: HttpRequest,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse, HttpError> {
    let db_client = &**get_database_client(&db_pool).await?;
    let current_user = get_current_user(db_client, &config.auth, &request).await?;
    let (target_type, target_id) = path.into_inner();
    let target_type = parse_target_type(&target_type)?;
    check_target_access(db_client, &current_user.id, &target_type, &target_id).await?;
    let breakdown = get_reaction_breakdown(db_client, &target_type, &target_id).await?;
    let target_reactions = TargetReactions {
        target_type,
        target_id,
        summary: ReactionSummary::new(breakdown, &current_user.id),
    };
    Ok(ApiResponse::ok("Reactions fetched successfully", target_reactions).into_response())
}

pub fn reaction_api_scope() -> Scope {
    web::scope("/likes")
        .service(react_view)
        .service(remove_reaction_view)
        .service(get_reactions_view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_type() {
        assert_eq!(parse_target_type("comment").unwrap(), TargetType::Comment);
        let error = parse_target_type("story").unwrap_err();
        assert_eq!(error.to_string(), "invalid target type");
    }

    #[test]
    fn test_parse_reaction_type() {
        assert_eq!(parse_reaction_type(None).unwrap(), ReactionType::Like);
        assert_eq!(parse_reaction_type(Some("haha")).unwrap(), ReactionType::Haha);
        assert!(parse_reaction_type(Some("wow")).is_err());
    }
}
