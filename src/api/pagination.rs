use chrono::{DateTime, Utc};
use serde::{de::Error as DeserializerError, Deserialize, Deserializer, Serialize};

use buddyscript_models::pagination::Page;
use buddyscript_utils::datetime::{format_timestamp, parse_timestamp};

#[derive(Debug, Deserialize)]
#[serde(try_from = "i64")]
pub struct PageSize(u16);

impl PageSize {
    /// Sizes above the maximum are clamped
    pub fn clamp(&self, max_size: u16) -> u16 {
        std::cmp::min(self.0, max_size)
    }
}

impl TryFrom<i64> for PageSize {
    type Error = &'static str;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 1 {
            return Err("limit must be a positive integer");
        };
        let size = u16::try_from(value).unwrap_or(u16::MAX);
        Ok(Self(size))
    }
}

fn deserialize_cursor<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
    where D: Deserializer<'de>
{
    let maybe_value: Option<String> = Option::deserialize(deserializer)?;
    match maybe_value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let cursor = parse_timestamp(value)
                .map_err(|_| DeserializerError::custom("invalid cursor"))?;
            Ok(Some(cursor))
        },
    }
}

#[derive(Deserialize)]
pub struct PageQueryParams {
    #[serde(default, deserialize_with = "deserialize_cursor")]
    pub cursor: Option<DateTime<Utc>>,
    pub limit: Option<PageSize>,
}

impl PageQueryParams {
    pub fn limit(&self, default_size: u16, max_size: u16) -> u16 {
        self.limit.as_ref()
            .map(|limit| limit.clamp(max_size))
            .unwrap_or(default_size)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl PageInfo {
    pub fn from_page<T>(
        page: &Page<T>,
        get_created_at: impl Fn(&T) -> DateTime<Utc>,
    ) -> Self {
        Self {
            next_cursor: page.next_cursor(get_created_at)
                .map(|cursor| format_timestamp(&cursor)),
            has_more: page.has_more,
        }
    }
}
