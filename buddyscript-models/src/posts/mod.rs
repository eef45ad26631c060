pub mod helpers;
pub mod queries;
pub mod types;
