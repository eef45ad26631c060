use log::{Level as LogLevel};
use serde::Deserialize;
use url::Url;

use super::auth::AuthConfig;
use super::environment::Environment;
use super::limits::Limits;
use super::media_host::MediaHostConfig;
use super::ConfigError;

fn default_log_level() -> LogLevel { LogLevel::Info }

fn default_client_url() -> String { "http://localhost:3000".to_string() }

#[derive(Clone, Deserialize)]
pub struct Config {
    // Properties auto-populated from the environment
    #[serde(skip)]
    pub environment: Environment,

    #[serde(skip)]
    pub config_path: String,

    // Core settings
    pub database_url: String,
    pub database_pool_size: Option<usize>,

    pub http_host: String,
    pub http_port: u32,

    // Origin of the web client, used for CORS
    #[serde(default = "default_client_url")]
    pub client_url: String,

    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    pub auth: AuthConfig,

    pub media_host: MediaHostConfig,

    #[serde(default)]
    pub limits: Limits,
}

impl Config {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.client_url)
            .map_err(|_| ConfigError("invalid client URL"))?;
        if self.database_pool_size == Some(0) {
            return Err(ConfigError("database pool size must be positive"));
        };
        self.auth.validate()?;
        self.media_host.validate()?;
        self.limits.pages.validate()?;
        Ok(())
    }

    pub fn client_origin(&self) -> String {
        // Validated at startup
        Url::parse(&self.client_url)
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_else(|_| self.client_url.clone())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(feature = "test-utils")]
impl Config {
    pub fn for_test(media_host_url: &str) -> Self {
        use super::limits::{MediaLimits, PageLimits};
        Self {
            environment: Environment::Development,
            config_path: "config.yaml".to_string(),
            database_url: "postgres://localhost/buddyscript_test".to_string(),
            database_pool_size: None,
            http_host: "127.0.0.1".to_string(),
            http_port: 8380,
            client_url: default_client_url(),
            log_level: default_log_level(),
            auth: AuthConfig::for_test(),
            media_host: MediaHostConfig::for_test(media_host_url),
            limits: Limits {
                media: MediaLimits::default(),
                pages: PageLimits::default(),
            },
        }
    }
}
