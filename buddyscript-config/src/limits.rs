use regex::Regex;
use serde::{de::Error as DeserializerError, Deserialize, Deserializer};

use super::ConfigError;

const FILE_SIZE_RE: &str = r#"^(?i)(?P<size>\d+)(?P<unit>[kmg]?)b?$"#;

fn parse_file_size(value: &str) -> Result<usize, ConfigError> {
    let file_size_re = Regex::new(FILE_SIZE_RE).expect("regexp should be valid");
    let caps = file_size_re
        .captures(value)
        .ok_or(ConfigError("invalid file size"))?;
    let size: usize = caps["size"]
        .to_string()
        .parse()
        .map_err(|_| ConfigError("invalid file size"))?;
    let unit = caps["unit"].to_string().to_lowercase();
    let multiplier = match unit.as_str() {
        "k" => usize::pow(10, 3),
        "m" => usize::pow(10, 6),
        "g" => usize::pow(10, 9),
        "" => 1,
        _ => return Err(ConfigError("invalid file size unit")),
    };
    Ok(size * multiplier)
}

fn deserialize_file_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let file_size_str = String::deserialize(deserializer)?;
    let file_size = parse_file_size(&file_size_str).map_err(DeserializerError::custom)?;
    Ok(file_size)
}

const fn default_file_size_limit() -> usize { 10 * 1024 * 1024 } // 10 MiB

#[derive(Clone, Deserialize)]
pub struct MediaLimits {
    #[serde(
        default = "default_file_size_limit",
        deserialize_with = "deserialize_file_size"
    )]
    pub file_size_limit: usize,
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self { file_size_limit: default_file_size_limit() }
    }
}

const fn default_feed_page_size() -> u16 { 20 }
const fn default_feed_page_max_size() -> u16 { 50 }
const fn default_comments_page_size() -> u16 { 10 }
const fn default_comments_page_max_size() -> u16 { 50 }

#[derive(Clone, Deserialize)]
pub struct PageLimits {
    #[serde(default = "default_feed_page_size")]
    pub feed_page_size: u16,
    #[serde(default = "default_feed_page_max_size")]
    pub feed_page_max_size: u16,
    #[serde(default = "default_comments_page_size")]
    pub comments_page_size: u16,
    #[serde(default = "default_comments_page_max_size")]
    pub comments_page_max_size: u16,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            feed_page_size: default_feed_page_size(),
            feed_page_max_size: default_feed_page_max_size(),
            comments_page_size: default_comments_page_size(),
            comments_page_max_size: default_comments_page_max_size(),
        }
    }
}

impl PageLimits {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.feed_page_size == 0 || self.feed_page_size > self.feed_page_max_size {
            return Err(ConfigError("invalid feed page size"));
        };
        if self.comments_page_size == 0 || self.comments_page_size > self.comments_page_max_size {
            return Err(ConfigError("invalid comments page size"));
        };
        Ok(())
    }
}

#[derive(Clone, Default, Deserialize)]
pub struct Limits {
    #[serde(default)]
    pub media: MediaLimits,
    #[serde(default)]
    pub pages: PageLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_size() {
        let file_size = parse_file_size("1234").unwrap();
        assert_eq!(file_size, 1234);
        let file_size = parse_file_size("89kB").unwrap();
        assert_eq!(file_size, 89_000);
        let file_size = parse_file_size("12M").unwrap();
        assert_eq!(file_size, 12_000_000);
    }

    #[test]
    fn test_default_page_limits() {
        let limits = PageLimits::default();
        assert_eq!(limits.feed_page_size, 20);
        assert_eq!(limits.feed_page_max_size, 50);
        assert_eq!(limits.comments_page_size, 10);
        assert!(limits.validate().is_ok());
    }
}
