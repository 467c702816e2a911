use thiserror::Error;

use crate::calendar::ChangeError;
use crate::storage::{StoreError, TimeWindowError};

/// Errors that stop a batch, or a single change within it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Invalid change at index {index}: {source}")]
    InvalidChange {
        index: usize,
        #[source]
        source: ChangeError,
    },
    #[error("No authenticated identity available")]
    Unauthenticated,
    #[error("No free slot found for '{summary}' after {attempts} attempts")]
    SlotSearchExhausted { summary: String, attempts: u32 },
    #[error(transparent)]
    Window(#[from] TimeWindowError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
