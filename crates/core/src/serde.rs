//! Serde helper functions for model-produced change requests.
//!
//! Upstream JSON is generated from free text, so it is loose: `null` where a
//! string is expected, blank optional fields, timestamps without seconds.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize a string, treating `null` as the empty string.
pub fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.unwrap_or_default())
}

/// Deserialize an ISO 8601 timestamp that carries a UTC offset.
/// Accepts RFC 3339 and the seconds-less form `YYYY-MM-DDTHH:MM±HH:MM`.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

/// Parses a timestamp with offset; see [`deserialize_timestamp`].
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, String> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z"))
        .map_err(|e| format!("invalid timestamp '{s}': {e}"))
}
