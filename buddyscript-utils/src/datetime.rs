use chrono::{DateTime, SecondsFormat, Utc};

/// Parses RFC 3339 timestamp (used as pagination cursor)
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let datetime = DateTime::parse_from_rfc3339(value.trim())?;
    Ok(datetime.with_timezone(&Utc))
}

/// Formats timestamp without losing database precision
pub fn format_timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Micros, true)
}
