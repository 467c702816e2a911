use std::sync::Arc;

use slotsync_core::calendar::{
    draft_for_change, CalendarId, ChangeKind, ChangeRequest, Principal,
};
use slotsync_core::reconcile::{validate_batch, BatchReport, ChangeOutcome, ReconcileError};
use slotsync_core::schedule::SlotPolicy;
use slotsync_core::storage::CalendarStore;

use crate::config::DEFAULT_TIME_ZONE;

use super::{find_slot, resolve_target};

/// Applies batches of change requests to one calendar store.
///
/// Changes run strictly in order, each store call awaited before the next.
/// There is no rollback: when a change fails, earlier ones stay applied and
/// later ones are reported as skipped.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn CalendarStore>,
    policy: SlotPolicy,
    default_time_zone: String,
    calendar_override: Option<CalendarId>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn CalendarStore>, policy: SlotPolicy) -> Self {
        Self {
            store,
            policy,
            default_time_zone: DEFAULT_TIME_ZONE.to_string(),
            calendar_override: None,
        }
    }

    pub fn with_default_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.default_time_zone = zone.into();
        self
    }

    /// Pins every principal to one calendar.
    pub fn with_calendar_override(mut self, calendar_id: Option<CalendarId>) -> Self {
        self.calendar_override = calendar_id;
        self
    }

    /// Applies `changes` on behalf of `principal`.
    ///
    /// Identity and validation problems reject the whole batch before any
    /// store call and come back as `Err`. Failures during execution are
    /// recorded in the returned report.
    pub async fn apply(
        &self,
        principal: Option<&Principal>,
        changes: &[ChangeRequest],
    ) -> Result<BatchReport, ReconcileError> {
        let principal = principal.ok_or(ReconcileError::Unauthenticated)?;
        validate_batch(changes)?;

        let calendar_id = self
            .calendar_override
            .clone()
            .unwrap_or_else(|| principal.calendar_id());

        tracing::info!(%calendar_id, changes = changes.len(), "Applying change batch");

        let mut report = BatchReport::new();
        for (index, change) in changes.iter().enumerate() {
            match self.apply_one(&calendar_id, index, change).await {
                Ok(outcome) => {
                    tracing::info!(index, summary = %outcome.summary(), outcome = ?outcome, "Change processed");
                    report.push(outcome);
                }
                Err(error) => {
                    tracing::error!(index, summary = %change.summary, error = %error, "Change failed, aborting batch");
                    let remaining = changes[index + 1..].iter().map(|c| c.summary.as_str());
                    report.abort(&change.summary, error, remaining);
                    break;
                }
            }
        }

        tracing::info!(
            %calendar_id,
            applied = report.applied_count(),
            not_found = report.not_found_count(),
            success = report.is_success(),
            "Change batch finished"
        );
        Ok(report)
    }

    async fn apply_one(
        &self,
        calendar_id: &CalendarId,
        index: usize,
        change: &ChangeRequest,
    ) -> Result<ChangeOutcome, ReconcileError> {
        let requested = change
            .window()
            .map_err(|source| ReconcileError::InvalidChange { index, source })?;
        let store = self.store.as_ref();

        match change.kind {
            ChangeKind::Create => {
                let window =
                    find_slot(store, calendar_id, &change.summary, requested, &self.policy).await?;
                let draft = draft_for_change(change, window, &self.default_time_zone);
                let event = store.insert_event(calendar_id, &draft).await?;

                if window == requested {
                    Ok(ChangeOutcome::Created {
                        summary: change.summary.clone(),
                        event_id: event.id,
                        window,
                    })
                } else {
                    Ok(ChangeOutcome::Rescheduled {
                        summary: change.summary.clone(),
                        event_id: event.id,
                        requested,
                        window,
                    })
                }
            }
            ChangeKind::Delete => {
                let Some(target) = resolve_target(store, calendar_id, change).await? else {
                    return Ok(not_found(change));
                };
                store.delete_event(calendar_id, &target.id).await?;
                Ok(ChangeOutcome::Deleted {
                    summary: change.summary.clone(),
                    event_id: target.id,
                })
            }
            ChangeKind::Modify => {
                let Some(target) = resolve_target(store, calendar_id, change).await? else {
                    return Ok(not_found(change));
                };
                let draft = draft_for_change(change, requested, &self.default_time_zone);
                let event = store.update_event(calendar_id, &target.id, &draft).await?;
                Ok(ChangeOutcome::Modified {
                    summary: change.summary.clone(),
                    event_id: event.id,
                    window: requested,
                })
            }
        }
    }
}

fn not_found(change: &ChangeRequest) -> ChangeOutcome {
    ChangeOutcome::NotFound {
        summary: change.summary.clone(),
    }
}
