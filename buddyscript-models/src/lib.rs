pub mod comments;
pub mod database;
pub mod pagination;
pub mod posts;
pub mod reactions;
pub mod users;
