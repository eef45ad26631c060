use serde::Deserialize;

use super::ConfigError;

fn default_api_url() -> String { "https://api.cloudinary.com/v1_1".to_string() }

fn default_folder() -> String { "posts".to_string() }

/// Credentials of the image hosting service (Cloudinary upload API)
#[derive(Clone, Deserialize)]
pub struct MediaHostConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,

    #[serde(default = "default_folder")]
    pub folder: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl MediaHostConfig {
    pub fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.api_url.trim_end_matches('/'),
            self.cloud_name,
            action,
        )
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(ConfigError("media host credentials are incomplete"));
        };
        Ok(())
    }
}

#[cfg(feature = "test-utils")]
impl MediaHostConfig {
    pub fn for_test(api_url: &str) -> Self {
        Self {
            cloud_name: "test".to_string(),
            api_key: "123456".to_string(),
            api_secret: "abcdef".to_string(),
            folder: default_folder(),
            api_url: api_url.to_string(),
        }
    }
}
