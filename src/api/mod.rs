use actix_web::{web, Scope};

pub mod auth;
pub mod comments;
pub mod healthcheck;
mod hydrate;
pub mod pagination;
pub mod posts;
pub mod reactions;
pub mod responses;
pub mod uploads;
pub mod users;

pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(healthcheck::healthcheck_view)
        .service(users::views::user_api_scope())
        .service(posts::views::post_api_scope())
        .service(comments::views::comment_api_scope())
        .service(reactions::views::reaction_api_scope())
}
