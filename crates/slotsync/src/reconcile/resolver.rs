use slotsync_core::calendar::{find_target, CalendarEvent, CalendarId, ChangeRequest};
use slotsync_core::reconcile::ReconcileError;
use slotsync_core::storage::{CalendarStore, TimeWindow};

/// Finds the existing event a delete or modify request refers to.
///
/// Searches the whole calendar days the request touches, filtered by its
/// summary, and picks the first case-insensitive exact match in store order.
/// Returns `None` when nothing matches.
pub async fn resolve_target(
    store: &dyn CalendarStore,
    calendar_id: &CalendarId,
    change: &ChangeRequest,
) -> Result<Option<CalendarEvent>, ReconcileError> {
    let window = TimeWindow::day_bounded(change.start, change.end)?;
    let events = store
        .list_events(calendar_id, window, Some(&change.summary))
        .await?;

    let target = find_target(&events, &change.summary).cloned();
    match &target {
        Some(event) => {
            tracing::debug!(%calendar_id, summary = %change.summary, event_id = %event.id, "Resolved target event")
        }
        None => tracing::debug!(
            %calendar_id,
            summary = %change.summary,
            candidates = events.len(),
            "No matching event"
        ),
    }
    Ok(target)
}
