mod auth;
mod config;
mod environment;
mod limits;
mod loader;
mod media_host;

pub use auth::AuthConfig;
pub use config::Config;
pub use environment::Environment;
pub use limits::{Limits, MediaLimits, PageLimits};
pub use loader::parse_config;
pub use media_host::MediaHostConfig;

pub const BUDDYSCRIPT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct ConfigError(&'static str);
