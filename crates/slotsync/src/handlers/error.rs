use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use slotsync_core::reconcile::{reconcile_error_to_status_code, ReconcileError};
use slotsync_core::storage::{store_error_to_status_code, StoreError};

/// Application error type that wraps `anyhow::Error`.
///
/// Reconcile and store errors keep their mapped status codes; anything else
/// is a 500.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(error) = self.0.downcast_ref::<ReconcileError>() {
            reconcile_error_to_status_code(error)
        } else if let Some(error) = self.0.downcast_ref::<StoreError>() {
            store_error_to_status_code(error)
        } else {
            500
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(error = %self.0, status = %status_code, "Request failed");
        } else {
            tracing::warn!(error = %self.0, status = %status_code, "Request rejected");
        }

        (
            status_code,
            Json(serde_json::json!({
                "error": self.0.to_string(),
                "outcomes": [],
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
