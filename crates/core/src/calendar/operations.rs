use chrono_tz::Tz;

use crate::storage::TimeWindow;

use super::error::ChangeError;
use super::requests::ChangeRequest;
use super::types::EventDraft;

/// Validates a change request before dispatch.
pub fn validate_change(change: &ChangeRequest) -> Result<(), ChangeError> {
    if change.summary.trim().is_empty() {
        return Err(ChangeError::EmptySummary);
    }
    change.window()?;
    if let Some(zone) = &change.time_zone {
        validate_time_zone(zone)?;
    }
    Ok(())
}

/// Checks that `zone` is a known IANA zone name.
pub fn validate_time_zone(zone: &str) -> Result<(), ChangeError> {
    zone.parse::<Tz>()
        .map(|_| ())
        .map_err(|_| ChangeError::UnknownTimeZone(zone.to_string()))
}

/// Picks the request's zone, falling back to `default_zone`.
pub fn effective_time_zone<'a>(change: &'a ChangeRequest, default_zone: &'a str) -> &'a str {
    change.time_zone.as_deref().unwrap_or(default_zone)
}

/// Builds the store payload for a change placed at `window`.
pub fn draft_for_change(change: &ChangeRequest, window: TimeWindow, default_zone: &str) -> EventDraft {
    EventDraft::new(
        change.summary.clone(),
        window,
        effective_time_zone(change, default_zone),
    )
    .with_description(change.description.clone())
}
