//! Interval and identity matching.
//!
//! Time ranges are half-open: `[from, to)`. Two ranges sharing only a
//! boundary point do not overlap.

use chrono::{DateTime, FixedOffset};

use crate::storage::TimeWindow;

use super::types::CalendarEvent;

/// Returns true if two windows overlap.
pub fn overlaps(a: &TimeWindow, b: &TimeWindow) -> bool {
    spans_overlap(a.from, a.to, b.from, b.to)
}

/// Returns true if an event's footprint overlaps `window`.
///
/// Works on the raw bounds so zero-length store events still count.
pub fn event_overlaps(event: &CalendarEvent, window: &TimeWindow) -> bool {
    spans_overlap(event.start, event.end, window.from, window.to)
}

fn spans_overlap(
    a_from: DateTime<FixedOffset>,
    a_to: DateTime<FixedOffset>,
    b_from: DateTime<FixedOffset>,
    b_to: DateTime<FixedOffset>,
) -> bool {
    a_from < b_to && b_from < a_to
}

/// Case-insensitive exact comparison of event summaries.
pub fn summary_matches(candidate: &str, target: &str) -> bool {
    candidate == target || candidate.to_lowercase() == target.to_lowercase()
}

/// Events from `events` whose footprint overlaps `window`, in input order.
pub fn conflicts_with<'a>(events: &'a [CalendarEvent], window: &TimeWindow) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|event| event_overlaps(event, window))
        .collect()
}

/// The first event (in store order) whose summary matches `summary`.
pub fn find_target<'a>(events: &'a [CalendarEvent], summary: &str) -> Option<&'a CalendarEvent> {
    events
        .iter()
        .find(|event| summary_matches(&event.summary, summary))
}
