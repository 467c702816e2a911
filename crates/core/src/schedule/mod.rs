//! Pure steps of the conflict-avoidance slot search.
//!
//! The search itself needs fresh store data on every iteration, so the loop
//! lives with the store calls; this module only decides what to do with one
//! query result.

use chrono::Duration;

use crate::calendar::{conflicts_with, CalendarEvent};
use crate::storage::{TimeWindow, TimeWindowError};

/// Default gap left after a conflicting event.
pub const DEFAULT_BUFFER_MINUTES: i64 = 15;
/// Default number of store queries before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 48;
/// Default forward-shift limit.
pub const DEFAULT_MAX_HORIZON_DAYS: i64 = 14;

/// Limits and spacing for the slot search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    /// Gap inserted after the conflicting event's end.
    pub buffer: Duration,
    /// Maximum number of store queries per search.
    pub max_attempts: u32,
    /// Maximum distance the start may move forward.
    pub max_horizon: Duration,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            buffer: Duration::minutes(DEFAULT_BUFFER_MINUTES),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_horizon: Duration::days(DEFAULT_MAX_HORIZON_DAYS),
        }
    }
}

impl SlotPolicy {
    pub fn with_buffer(mut self, buffer: Duration) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_horizon(mut self, max_horizon: Duration) -> Self {
        self.max_horizon = max_horizon;
        self
    }

    /// Returns true if `candidate` has not drifted past the horizon.
    pub fn within_horizon(&self, requested: &TimeWindow, candidate: &TimeWindow) -> bool {
        candidate.from - requested.from <= self.max_horizon
    }
}

/// Outcome of checking one candidate window against one query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStep {
    /// Nothing overlaps the candidate.
    Free(TimeWindow),
    /// The candidate collides; try this window next.
    Retry(TimeWindow),
}

/// Decides the next step for `candidate` given the events a store returned.
///
/// On conflict the start moves to the latest end among the overlapping
/// events plus `buffer`, keeping the original duration. Any overlapping
/// event ends after the candidate starts, so a non-negative `buffer` always
/// moves the candidate forward.
pub fn next_step(
    candidate: TimeWindow,
    events: &[CalendarEvent],
    buffer: Duration,
) -> Result<SlotStep, TimeWindowError> {
    let conflicts = conflicts_with(events, &candidate);
    let Some(latest_end) = conflicts.iter().map(|event| event.end).max() else {
        return Ok(SlotStep::Free(candidate));
    };

    let from = latest_end
        .checked_add_signed(buffer)
        .ok_or(TimeWindowError::OutOfRange)?;
    Ok(SlotStep::Retry(candidate.shifted_to(from)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn window(from: &str, to: &str) -> TimeWindow {
        TimeWindow::new(ts(from), ts(to)).unwrap()
    }

    fn event(from: &str, to: &str) -> CalendarEvent {
        CalendarEvent {
            id: format!("evt-{from}"),
            summary: "Busy".to_string(),
            description: String::new(),
            start: ts(from),
            end: ts(to),
            time_zone: "America/Toronto".to_string(),
        }
    }

    fn buffer() -> Duration {
        Duration::minutes(15)
    }

    #[test]
    fn test_free_when_calendar_empty() {
        let candidate = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");

        let step = next_step(candidate, &[], buffer()).unwrap();

        assert_eq!(step, SlotStep::Free(candidate));
    }

    #[test]
    fn test_free_when_events_only_touch() {
        let candidate = window("2024-03-10T11:00:00-04:00", "2024-03-10T12:00:00-04:00");
        let events = vec![
            event("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00"),
            event("2024-03-10T12:00:00-04:00", "2024-03-10T13:00:00-04:00"),
        ];

        let step = next_step(candidate, &events, buffer()).unwrap();

        assert_eq!(step, SlotStep::Free(candidate));
    }

    #[test]
    fn test_single_conflict_applies_buffer() {
        let candidate = window("2024-03-10T09:45:00-04:00", "2024-03-10T10:45:00-04:00");
        let events = vec![event("2024-03-10T10:00:00-04:00", "2024-03-10T10:30:00-04:00")];

        let step = next_step(candidate, &events, buffer()).unwrap();

        assert_eq!(
            step,
            SlotStep::Retry(window(
                "2024-03-10T10:45:00-04:00",
                "2024-03-10T11:45:00-04:00"
            ))
        );
    }

    #[test]
    fn test_multiple_conflicts_use_latest_end() {
        let candidate = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");
        let events = vec![
            event("2024-03-10T10:50:00-04:00", "2024-03-10T12:00:00-04:00"),
            event("2024-03-10T09:30:00-04:00", "2024-03-10T10:15:00-04:00"),
        ];

        let step = next_step(candidate, &events, buffer()).unwrap();

        assert_eq!(
            step,
            SlotStep::Retry(window(
                "2024-03-10T12:15:00-04:00",
                "2024-03-10T13:15:00-04:00"
            ))
        );
    }

    #[test]
    fn test_non_overlapping_results_are_ignored() {
        let candidate = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");
        let events = vec![event("2024-03-10T13:00:00-04:00", "2024-03-10T14:00:00-04:00")];

        let step = next_step(candidate, &events, buffer()).unwrap();

        assert_eq!(step, SlotStep::Free(candidate));
    }

    #[test]
    fn test_retry_always_moves_forward() {
        let candidate = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");
        let events = vec![event("2024-03-10T10:30:00-04:00", "2024-03-10T10:30:00-04:00")];

        let SlotStep::Retry(next) = next_step(candidate, &events, Duration::zero()).unwrap() else {
            panic!("expected retry");
        };

        assert!(next.from > candidate.from);
        assert_eq!(next.duration(), candidate.duration());
    }

    #[test]
    fn test_within_horizon() {
        let policy = SlotPolicy::default().with_max_horizon(Duration::days(1));
        let requested = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");
        let near = window("2024-03-11T10:00:00-04:00", "2024-03-11T11:00:00-04:00");
        let far = window("2024-03-11T10:15:00-04:00", "2024-03-11T11:15:00-04:00");

        assert!(policy.within_horizon(&requested, &near));
        assert!(!policy.within_horizon(&requested, &far));
    }

    #[test]
    fn test_default_policy() {
        let policy = SlotPolicy::default();
        assert_eq!(policy.buffer, Duration::minutes(15));
        assert_eq!(policy.max_attempts, 48);
        assert_eq!(policy.max_horizon, Duration::days(14));
    }
}
