//! Pure functions for mapping store errors to HTTP status codes.
//!
//! Follows the Functional Core pattern - pure functions with no side effects.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Unauthorized` -> 502 (Bad Gateway, the upstream refused our credentials)
/// - `RateLimited` -> 429 (Too Many Requests)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 502 (Bad Gateway)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use slotsync_core::storage::{StoreError, store_error_to_status_code};
///
/// let error = StoreError::RateLimited("quota".to_string());
/// assert_eq!(store_error_to_status_code(&error), 429);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::NotFound { .. } => 404,
        StoreError::Unauthorized(_) => 502,
        StoreError::RateLimited(_) => 429,
        StoreError::ConnectionFailed(_) => 503,
        StoreError::QueryFailed(_) => 502,
        StoreError::Serialization(_) => 500,
        StoreError::InvalidData(_) => 500,
    }
}
