//! Error types and status mapping for the Google Calendar backend.

use serde::Deserialize;
use slotsync_core::storage::StoreError;
use thiserror::Error;

/// Errors that can occur while obtaining Google credentials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GoogleAuthError {
    #[error("No Google credentials: set GOOGLE_SERVICE_ACCOUNT_FILE or GOOGLE_ACCESS_TOKEN")]
    MissingCredentials,
    #[error("Failed to read service account key {path}: {message}")]
    ReadKey { path: String, message: String },
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),
    #[error("Failed to sign token assertion: {0}")]
    Signing(String),
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),
}

impl From<GoogleAuthError> for StoreError {
    fn from(err: GoogleAuthError) -> Self {
        StoreError::Unauthorized(err.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pulls `error.message` out of a Google error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Maps a non-2xx Google Calendar response to a [`StoreError`].
///
/// - 401, 403 -> `Unauthorized`
/// - 404, 410 -> `NotFound` for `resource`
/// - 429 -> `RateLimited`
/// - anything else -> `QueryFailed`
pub fn status_to_store_error(status: u16, resource: &str, body: &str) -> StoreError {
    let message = error_message(body);
    match status {
        401 | 403 => StoreError::Unauthorized(message),
        404 | 410 => StoreError::NotFound {
            entity_type: "CalendarEvent",
            id: resource.to_string(),
        },
        429 => StoreError::RateLimited(message),
        _ => StoreError::QueryFailed(format!("{status}: {message}")),
    }
}

/// Maps a reqwest failure to a [`StoreError`].
pub fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Serialization(err.to_string())
    } else {
        StoreError::ConnectionFailed(err.to_string())
    }
}
