//! Change request types.
//!
//! These are the structured mutations produced upstream from free text.
//! Following the Functional Core pattern, these are pure data types with no I/O.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_nullable_string, deserialize_optional_string, deserialize_timestamp};
use crate::storage::TimeWindow;

use super::error::ChangeError;

/// What a change request does to the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Delete,
    Modify,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChangeKind::Create => "create",
            ChangeKind::Delete => "delete",
            ChangeKind::Modify => "modify",
        };
        f.write_str(name)
    }
}

/// One requested mutation of the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub summary: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start: DateTime<FixedOffset>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end: DateTime<FixedOffset>,
    #[serde(rename = "event_type", alias = "kind")]
    pub kind: ChangeKind,
    /// IANA zone name; the configured default applies when absent.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_zone: Option<String>,
}

impl ChangeRequest {
    fn new(
        kind: ChangeKind,
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            summary: summary.into(),
            description: String::new(),
            start,
            end,
            kind,
            time_zone: None,
        }
    }

    /// Create a request that inserts a new event.
    pub fn create(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self::new(ChangeKind::Create, summary, start, end)
    }

    /// Create a request that deletes the event with a matching summary.
    pub fn delete(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self::new(ChangeKind::Delete, summary, start, end)
    }

    /// Create a request that rewrites the event with a matching summary.
    pub fn modify(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self::new(ChangeKind::Modify, summary, start, end)
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the IANA time zone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// The requested `[start, end)` window.
    pub fn window(&self) -> Result<TimeWindow, ChangeError> {
        TimeWindow::new(self.start, self.end).map_err(|_| ChangeError::InvalidTimeRange)
    }
}

/// Request body carrying an ordered batch of changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatch {
    pub changes: Vec<ChangeRequest>,
}
