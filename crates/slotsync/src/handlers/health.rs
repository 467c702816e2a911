//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Static service info (no store round-trip)

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

#[cfg(feature = "google")]
const STORE_BACKEND: &str = "google";
#[cfg(feature = "inmemory")]
const STORE_BACKEND: &str = "inmemory";

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Service info.
///
/// Does not call the calendar store.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "store": STORE_BACKEND,
        "default_time_zone": state.config.default_time_zone,
    }))
}
