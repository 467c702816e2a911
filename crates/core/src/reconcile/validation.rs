use crate::calendar::{validate_change, ChangeRequest};

use super::ReconcileError;

/// Validates every change before any store work begins.
///
/// Returns the first invalid entry with its position in the batch.
pub fn validate_batch(changes: &[ChangeRequest]) -> Result<(), ReconcileError> {
    changes
        .iter()
        .enumerate()
        .try_for_each(|(index, change)| {
            validate_change(change).map_err(|source| ReconcileError::InvalidChange { index, source })
        })
}
