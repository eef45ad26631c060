use regex::Regex;
use serde::{de::Error as DeserializerError, Deserialize, Deserializer};

use super::ConfigError;

const DURATION_RE: &str = r#"^(?i)(?P<value>\d+)(?P<unit>[smhd]?)$"#;

/// Parses durations like "15m", "1d" or "3600" into seconds
fn parse_duration(value: &str) -> Result<i64, ConfigError> {
    let duration_re = Regex::new(DURATION_RE).expect("regexp should be valid");
    let caps = duration_re
        .captures(value.trim())
        .ok_or(ConfigError("invalid duration"))?;
    let amount: i64 = caps["value"]
        .parse()
        .map_err(|_| ConfigError("invalid duration"))?;
    let unit = caps["unit"].to_lowercase();
    let multiplier = match unit.as_str() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        _ => return Err(ConfigError("invalid duration unit")),
    };
    if amount == 0 {
        return Err(ConfigError("duration must be positive"));
    };
    Ok(amount * multiplier)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let duration_str = String::deserialize(deserializer)?;
    let duration = parse_duration(&duration_str).map_err(DeserializerError::custom)?;
    Ok(duration)
}

const fn default_access_token_expiry() -> i64 { 60 * 60 * 24 } // 1 day
const fn default_refresh_token_expiry() -> i64 { 60 * 60 * 24 * 10 } // 10 days

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub access_token_secret: String,

    #[serde(
        default = "default_access_token_expiry",
        deserialize_with = "deserialize_duration",
    )]
    pub access_token_expiry: i64,

    pub refresh_token_secret: String,

    #[serde(
        default = "default_refresh_token_expiry",
        deserialize_with = "deserialize_duration",
    )]
    pub refresh_token_expiry: i64,
}

impl AuthConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret.is_empty() || self.refresh_token_secret.is_empty() {
            return Err(ConfigError("token secrets must not be empty"));
        };
        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError("access and refresh tokens must use different secrets"));
        };
        Ok(())
    }
}

#[cfg(feature = "test-utils")]
impl AuthConfig {
    pub fn for_test() -> Self {
        Self {
            access_token_secret: "test-access-secret".to_string(),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_secret: "test-refresh-secret".to_string(),
            refresh_token_expiry: default_refresh_token_expiry(),
        }
    }
}
