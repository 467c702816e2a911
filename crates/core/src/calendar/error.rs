use thiserror::Error;

/// Errors that can occur when validating a change request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChangeError {
    #[error("Event summary cannot be empty")]
    EmptySummary,
    #[error("End time must be after start time")]
    InvalidTimeRange,
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}
