use async_trait::async_trait;

use crate::calendar::{CalendarEvent, CalendarId, EventDraft};

use super::{Result, TimeWindow};

/// A remote, authoritative calendar store addressed by calendar identifier.
///
/// Implementations must not retry on their own: a failed call is surfaced
/// to the caller as-is.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Lists events overlapping `window`, in the store's natural order.
    ///
    /// When `text_filter` is set the store may narrow results server-side;
    /// callers still match summaries themselves.
    async fn list_events(
        &self,
        calendar_id: &CalendarId,
        window: TimeWindow,
        text_filter: Option<&str>,
    ) -> Result<Vec<CalendarEvent>>;

    /// Inserts a new event. The store assigns the id.
    async fn insert_event(
        &self,
        calendar_id: &CalendarId,
        draft: &EventDraft,
    ) -> Result<CalendarEvent>;

    /// Replaces the event with the given id.
    async fn update_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarEvent>;

    /// Deletes the event with the given id.
    async fn delete_event(&self, calendar_id: &CalendarId, event_id: &str) -> Result<()>;
}
