use slotsync_core::calendar::CalendarId;
use slotsync_core::reconcile::ReconcileError;
use slotsync_core::schedule::{next_step, SlotPolicy, SlotStep};
use slotsync_core::storage::{CalendarStore, TimeWindow};

/// Finds the first free window at or after `requested`, keeping its length.
///
/// Every attempt re-queries the store, so the result reflects the calendar
/// as of the last query. Gives up with `SlotSearchExhausted` once the policy's
/// attempt count or horizon is used up.
pub async fn find_slot(
    store: &dyn CalendarStore,
    calendar_id: &CalendarId,
    summary: &str,
    requested: TimeWindow,
    policy: &SlotPolicy,
) -> Result<TimeWindow, ReconcileError> {
    let mut candidate = requested;

    for attempt in 1..=policy.max_attempts {
        let events = store.list_events(calendar_id, candidate, None).await?;

        match next_step(candidate, &events, policy.buffer)? {
            SlotStep::Free(window) => {
                tracing::debug!(%calendar_id, summary, attempt, from = %window.from, "Found free slot");
                return Ok(window);
            }
            SlotStep::Retry(next) => {
                tracing::debug!(
                    %calendar_id,
                    summary,
                    attempt,
                    from = %next.from,
                    "Slot taken, moving candidate"
                );
                if !policy.within_horizon(&requested, &next) {
                    tracing::warn!(%calendar_id, summary, attempt, "Slot search passed horizon");
                    return Err(ReconcileError::SlotSearchExhausted {
                        summary: summary.to_string(),
                        attempts: attempt,
                    });
                }
                candidate = next;
            }
        }
    }

    tracing::warn!(%calendar_id, summary, attempts = policy.max_attempts, "Slot search ran out of attempts");
    Err(ReconcileError::SlotSearchExhausted {
        summary: summary.to_string(),
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::testing::{calendar, event, window, RecordingStore};
    use chrono::Duration;
    use slotsync_core::calendar::conflicts_with;
    use slotsync_core::storage::StoreError;

    #[tokio::test]
    async fn test_free_slot_returned_unchanged() {
        let store = RecordingStore::new();
        let requested = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");

        let slot = find_slot(&store, &calendar(), "Study", requested, &SlotPolicy::default())
            .await
            .unwrap();

        assert_eq!(slot, requested);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_chain_of_conflicts() {
        let store = RecordingStore::new();
        store
            .seed(event("A", "2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00"))
            .await;
        store
            .seed(event("B", "2024-03-10T11:10:00-04:00", "2024-03-10T12:00:00-04:00"))
            .await;
        let requested = window("2024-03-10T10:30:00-04:00", "2024-03-10T11:30:00-04:00");

        let slot = find_slot(&store, &calendar(), "Study", requested, &SlotPolicy::default())
            .await
            .unwrap();

        // 11:15 collides with B, which pushes the start to 12:15
        assert_eq!(
            slot,
            window("2024-03-10T12:15:00-04:00", "2024-03-10T13:15:00-04:00")
        );
        assert_eq!(store.list_calls(), 3);

        let events = store.events().await;
        assert!(conflicts_with(&events, &slot).is_empty());
    }

    #[tokio::test]
    async fn test_attempt_limit() {
        let store = RecordingStore::new();
        for hour in 10..20 {
            store
                .seed(event(
                    "Busy",
                    &format!("2024-03-10T{hour}:00:00-04:00"),
                    &format!("2024-03-10T{hour}:50:00-04:00"),
                ))
                .await;
        }
        let policy = SlotPolicy::default().with_max_attempts(3);
        let requested = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");

        let result = find_slot(&store, &calendar(), "Study", requested, &policy).await;

        assert_eq!(
            result,
            Err(ReconcileError::SlotSearchExhausted {
                summary: "Study".to_string(),
                attempts: 3,
            })
        );
        assert_eq!(store.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_horizon_limit() {
        let store = RecordingStore::new();
        store
            .seed(event("All Week", "2024-03-10T00:00:00-04:00", "2024-03-17T00:00:00-04:00"))
            .await;
        let policy = SlotPolicy::default().with_max_horizon(Duration::days(2));
        let requested = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");

        let result = find_slot(&store, &calendar(), "Study", requested, &policy).await;

        assert_eq!(
            result,
            Err(ReconcileError::SlotSearchExhausted {
                summary: "Study".to_string(),
                attempts: 1,
            })
        );
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let store = RecordingStore::new().failing_list(StoreError::RateLimited("quota".to_string()));
        let requested = window("2024-03-10T10:00:00-04:00", "2024-03-10T11:00:00-04:00");

        let result = find_slot(&store, &calendar(), "Study", requested, &SlotPolicy::default()).await;

        assert_eq!(
            result,
            Err(ReconcileError::Store(StoreError::RateLimited(
                "quota".to_string()
            )))
        );
    }
}
