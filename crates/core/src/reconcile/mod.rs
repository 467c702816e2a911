//! Batch-level types for applying change requests.

mod error;
mod http_mapping;
mod outcome;
mod validation;

pub use error::ReconcileError;
pub use http_mapping::reconcile_error_to_status_code;
pub use outcome::{BatchReport, ChangeOutcome};
pub use validation::validate_batch;
