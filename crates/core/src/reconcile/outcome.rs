use serde::{Deserialize, Serialize};

use crate::storage::TimeWindow;

use super::ReconcileError;

/// The terminal state of one change request within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChangeOutcome {
    /// Inserted at the requested window.
    Created {
        summary: String,
        event_id: String,
        window: TimeWindow,
    },
    /// Inserted at a later window because the requested one was taken.
    Rescheduled {
        summary: String,
        event_id: String,
        requested: TimeWindow,
        window: TimeWindow,
    },
    Deleted {
        summary: String,
        event_id: String,
    },
    Modified {
        summary: String,
        event_id: String,
        window: TimeWindow,
    },
    /// No event with a matching summary in the searched days.
    NotFound { summary: String },
    Failed { summary: String, error: String },
    /// Never attempted because an earlier change failed.
    Skipped { summary: String },
}

impl ChangeOutcome {
    pub fn summary(&self) -> &str {
        match self {
            ChangeOutcome::Created { summary, .. }
            | ChangeOutcome::Rescheduled { summary, .. }
            | ChangeOutcome::Deleted { summary, .. }
            | ChangeOutcome::Modified { summary, .. }
            | ChangeOutcome::NotFound { summary }
            | ChangeOutcome::Failed { summary, .. }
            | ChangeOutcome::Skipped { summary } => summary,
        }
    }

    /// Returns true if the store was mutated for this change.
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            ChangeOutcome::Created { .. }
                | ChangeOutcome::Rescheduled { .. }
                | ChangeOutcome::Deleted { .. }
                | ChangeOutcome::Modified { .. }
        )
    }
}

/// Ordered per-change outcomes of one batch.
///
/// There is no rollback: applied changes stay applied when a later one fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<ChangeOutcome>,
    /// The error that aborted the batch, if any.
    pub failure: Option<ReconcileError>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ChangeOutcome) {
        self.outcomes.push(outcome);
    }

    /// Records a fatal error for the current change and marks the rest skipped.
    pub fn abort<'a>(
        &mut self,
        summary: &str,
        error: ReconcileError,
        remaining: impl IntoIterator<Item = &'a str>,
    ) {
        self.outcomes.push(ChangeOutcome::Failed {
            summary: summary.to_string(),
            error: error.to_string(),
        });
        self.outcomes
            .extend(remaining.into_iter().map(|summary| ChangeOutcome::Skipped {
                summary: summary.to_string(),
            }));
        self.failure = Some(error);
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    pub fn not_found_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ChangeOutcome::NotFound { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;
    use chrono::DateTime;

    fn window() -> TimeWindow {
        TimeWindow::new(
            DateTime::parse_from_rfc3339("2024-03-10T10:00:00-04:00").unwrap(),
            DateTime::parse_from_rfc3339("2024-03-10T11:00:00-04:00").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = ChangeOutcome::NotFound {
            summary: "Physics Review".to_string(),
        };

        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["status"], "not_found");
        assert_eq!(value["summary"], "Physics Review");
    }

    #[test]
    fn test_rescheduled_serializes_both_windows() {
        let outcome = ChangeOutcome::Rescheduled {
            summary: "Study Session".to_string(),
            event_id: "evt-1".to_string(),
            requested: window(),
            window: window(),
        };

        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["status"], "rescheduled");
        assert_eq!(value["requested"]["from"], "2024-03-10T10:00:00-04:00");
    }

    #[test]
    fn test_report_counts() {
        let mut report = BatchReport::new();
        report.push(ChangeOutcome::Created {
            summary: "A".to_string(),
            event_id: "1".to_string(),
            window: window(),
        });
        report.push(ChangeOutcome::NotFound {
            summary: "B".to_string(),
        });

        assert!(report.is_success());
        assert_eq!(report.applied_count(), 1);
        assert_eq!(report.not_found_count(), 1);
    }

    #[test]
    fn test_abort_marks_remaining_skipped() {
        let mut report = BatchReport::new();
        report.push(ChangeOutcome::Deleted {
            summary: "A".to_string(),
            event_id: "1".to_string(),
        });

        report.abort(
            "B",
            ReconcileError::Store(StoreError::RateLimited("quota".to_string())),
            ["C", "D"],
        );

        assert!(!report.is_success());
        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.applied_count(), 1);
        assert!(matches!(report.outcomes[1], ChangeOutcome::Failed { .. }));
        assert_eq!(
            report.outcomes[3],
            ChangeOutcome::Skipped {
                summary: "D".to_string()
            }
        );
    }
}
