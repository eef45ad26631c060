pub mod api;
pub mod errors;
pub mod http;
pub mod logger;
pub mod media_host;
pub mod validators;
