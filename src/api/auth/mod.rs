pub mod cookies;
pub mod current_user;
pub mod tokens;
