//! Change batch endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotsync_core::calendar::ChangeBatch;
use slotsync_core::reconcile::{reconcile_error_to_status_code, BatchReport, ReconcileError};
use tracing::Instrument;

use crate::{context::RequestContext, handlers::AppError, state::AppState};

const SUCCESS_MESSAGE: &str = "Events processed successfully";

/// POST /api/changes - Apply a batch of change requests.
///
/// The identity check runs first, so an anonymous request gets a 401 even
/// when its body is malformed.
#[axum::debug_handler]
pub async fn apply_changes(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<ChangeBatch>, JsonRejection>,
) -> Result<Response, AppError> {
    let span = tracing::info_span!("apply_changes", request_id = %ctx.request_id);

    async move {
        let Some(principal) = ctx.principal else {
            return Err(AppError::from(ReconcileError::Unauthenticated));
        };

        let Json(batch) = match payload {
            Ok(batch) => batch,
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "Rejected change batch body");
                return Ok(bad_request(rejection.body_text()));
            }
        };

        let report = state
            .reconciler()
            .apply(Some(&principal), &batch.changes)
            .await?;

        Ok::<_, AppError>(report_response(report))
    }
    .instrument(span)
    .await
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message, "outcomes": [] })),
    )
        .into_response()
}

fn report_response(report: BatchReport) -> Response {
    match report.failure {
        None => (
            StatusCode::OK,
            Json(json!({
                "message": SUCCESS_MESSAGE,
                "outcomes": report.outcomes,
            })),
        )
            .into_response(),
        Some(error) => {
            let status = StatusCode::from_u16(reconcile_error_to_status_code(&error))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({
                    "error": error.to_string(),
                    "outcomes": report.outcomes,
                })),
            )
                .into_response()
        }
    }
}
