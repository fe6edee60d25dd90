use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::Json;
use std::net::SocketAddr;

use crate::models::{
    ExplainRequest, ExplainResponse, SearchFilters, SearchRequest, SearchResponse, StatsResponse,
};
use crate::state::AppState;

use super::{engine_or_unavailable, rate_limit_gate};

/// POST /api/search - Embed the query and return the nearest chunks.
pub async fn search(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let engine = engine_or_unavailable(&state)?;
    rate_limit_gate(&state, &addr.ip().to_string(), "search")?;

    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "query is required".to_string()));
    }

    let filters = SearchFilters {
        language_filter: req.language_filter,
        min_score: Some(req.min_score),
    };

    let response = engine
        .searcher
        .search(&query, req.top_k, &filters)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;

    Ok(Json(response))
}

/// GET /api/stats - Total indexed document count.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let engine = engine_or_unavailable(&state)?;
    Ok(Json(engine.searcher.get_stats()))
}

/// POST /api/explain - Explain a snippet in the context of a query.
///
/// Always 200 once the engine is up: a missing or failing LLM comes back
/// as explanation text, not as an error status.
pub async fn explain(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, (StatusCode, String)> {
    let engine = engine_or_unavailable(&state)?;

    let explanation = engine.searcher.explain(&req.code, &req.query).await;
    Ok(Json(ExplainResponse { explanation }))
}
