use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::Json;
use std::net::SocketAddr;

use crate::models::{IndexRequest, IndexResponse};
use crate::state::AppState;

use super::{engine_or_unavailable, rate_limit_gate};

/// POST /api/index - Walk a repository path and index its chunks.
///
/// Runs inline with the request; large repositories block until done.
pub async fn index_repository(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<IndexRequest>,
) -> Result<Json<IndexResponse>, (StatusCode, String)> {
    let engine = engine_or_unavailable(&state)?;
    rate_limit_gate(&state, &addr.ip().to_string(), "upload")?;

    let repo_path = req.repo_path.trim().to_string();
    if repo_path.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "repo_path is required".to_string()));
    }

    tracing::info!("Indexing {repo_path} (languages: {:?})", req.languages);

    let response = engine
        .indexer
        .index_repository(&repo_path, req.languages.as_deref())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;

    Ok(Json(response))
}
