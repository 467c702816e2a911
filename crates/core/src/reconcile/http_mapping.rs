//! Pure functions for mapping reconcile errors to HTTP status codes.

use crate::storage::store_error_to_status_code;

use super::ReconcileError;

/// Maps a [`ReconcileError`] to an HTTP status code.
///
/// - `InvalidChange` -> 400 (Bad Request)
/// - `Unauthenticated` -> 401 (Unauthorized)
/// - `SlotSearchExhausted` -> 409 (Conflict)
/// - `Window` -> 400 (Bad Request)
/// - `Store` -> see [`store_error_to_status_code`]
///
/// # Examples
///
/// ```
/// use slotsync_core::reconcile::{ReconcileError, reconcile_error_to_status_code};
///
/// assert_eq!(reconcile_error_to_status_code(&ReconcileError::Unauthenticated), 401);
/// ```
pub fn reconcile_error_to_status_code(error: &ReconcileError) -> u16 {
    match error {
        ReconcileError::InvalidChange { .. } => 400,
        ReconcileError::Unauthenticated => 401,
        ReconcileError::SlotSearchExhausted { .. } => 409,
        ReconcileError::Window(_) => 400,
        ReconcileError::Store(e) => store_error_to_status_code(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ChangeError;
    use crate::storage::{StoreError, TimeWindowError};

    #[test]
    fn test_invalid_change_maps_to_400() {
        let error = ReconcileError::InvalidChange {
            index: 0,
            source: ChangeError::EmptySummary,
        };
        assert_eq!(reconcile_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_slot_search_exhausted_maps_to_409() {
        let error = ReconcileError::SlotSearchExhausted {
            summary: "Study Session".to_string(),
            attempts: 48,
        };
        assert_eq!(reconcile_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_window_maps_to_400() {
        let error = ReconcileError::Window(TimeWindowError::OutOfRange);
        assert_eq!(reconcile_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_store_error_delegates() {
        let error = ReconcileError::Store(StoreError::ConnectionFailed("reset".to_string()));
        assert_eq!(reconcile_error_to_status_code(&error), 503);
    }
}
