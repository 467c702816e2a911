use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::storage::TimeWindow;

/// Identifier of the remote calendar a batch is applied to.
///
/// Derived from the authenticated principal's address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CalendarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated identity a batch runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
}

impl Principal {
    /// Creates a principal, returning `None` for a blank address.
    pub fn new(email: impl Into<String>) -> Option<Self> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return None;
        }
        Some(Self { email })
    }

    /// The calendar owned by this principal.
    pub fn calendar_id(&self) -> CalendarId {
        CalendarId::new(self.email.clone())
    }
}

/// An event as returned by the calendar store.
///
/// Always transient query output: never mutated locally, re-fetched before
/// every decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Opaque id assigned by the store.
    pub id: String,
    pub summary: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// IANA zone name.
    pub time_zone: String,
}

impl CalendarEvent {
    /// Builds a stored event from a draft and a store-assigned id.
    pub fn from_draft(id: impl Into<String>, draft: &EventDraft) -> Self {
        Self {
            id: id.into(),
            summary: draft.summary.clone(),
            description: draft.description.clone(),
            start: draft.start,
            end: draft.end,
            time_zone: draft.time_zone.clone(),
        }
    }
}

/// The write-side payload for inserting or replacing an event.
///
/// Carries no id: ids are only ever assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub summary: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub time_zone: String,
}

impl EventDraft {
    /// Creates a draft spanning `window`.
    pub fn new(
        summary: impl Into<String>,
        window: TimeWindow,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            description: String::new(),
            start: window.from,
            end: window.to,
            time_zone: time_zone.into(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
