use thiserror::Error;

/// Errors that can occur when constructing a time window.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeWindowError {
    #[error("Invalid time window: start must be before end")]
    InvalidRange,
    #[error("Time window is outside the representable range")]
    OutOfRange,
}

/// Errors that can occur while talking to a calendar store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Store rejected credentials: {0}")]
    Unauthorized(String),
    #[error("Store rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
