//! Axum extractor for RequestContext.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use slotsync_core::calendar::Principal;
use uuid::Uuid;

use super::types::{RequestContext, RequestId};
use crate::state::AppState;

fn extract_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId::from_uuid)
        .unwrap_or_else(RequestId::new)
}

fn extract_principal(headers: &HeaderMap, header_name: &str) -> Option<Principal> {
    headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .and_then(Principal::new)
}

impl<S> FromRequestParts<S> for RequestContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let principal = extract_principal(&parts.headers, &app_state.config.identity_header);
        let request_id = extract_request_id(&parts.headers);

        Ok(RequestContext {
            principal,
            request_id,
        })
    }
}
