//! Axum HTTP handlers.

pub mod index;
pub mod search;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::state::{AppState, Engine};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Engine handle, or 503 when startup initialization failed.
pub(crate) fn engine_or_unavailable(
    state: &AppState,
) -> Result<Arc<Engine>, (StatusCode, String)> {
    state.engine.clone().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Search engine not initialized".to_string(),
    ))
}

/// Rate-limit gate; 429 with the limiter's message on rejection.
pub(crate) fn rate_limit_gate(
    state: &AppState,
    identity: &str,
    action: &str,
) -> Result<(), (StatusCode, String)> {
    let (allowed, message) = state.rate_limiter.is_allowed(identity, action);
    if allowed {
        Ok(())
    } else {
        Err((StatusCode::TOO_MANY_REQUESTS, message))
    }
}
