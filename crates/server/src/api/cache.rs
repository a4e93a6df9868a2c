//! Cache admin API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use streamhoard_core::{CacheStats, ContentId, ContentType};
use tracing::info;

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: u64,
}

/// GET /api/v1/cache/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CacheStats>, (StatusCode, Json<ErrorResponse>)> {
    state.cache().stats().map(Json).map_err(|e| {
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// DELETE /api/v1/cache
///
/// Clear every cached entry.
pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RemovedResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.cache().clear() {
        Ok(removed) => {
            info!(removed, "Stream cache cleared");
            Ok(Json(RemovedResponse { removed }))
        }
        Err(e) => Err(ErrorResponse::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            e.to_string(),
        )),
    }
}

/// DELETE /api/v1/cache/{content_type}/{id}
///
/// Manual eviction: exact id for series, every id containing the title for movies.
pub async fn evict_entry(
    State(state): State<Arc<AppState>>,
    Path((content_type, id)): Path<(String, String)>,
) -> Result<Json<RemovedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let content_type: ContentType = content_type
        .parse()
        .map_err(|e: streamhoard_core::ContentError| {
            ErrorResponse::with_status(StatusCode::NOT_FOUND, e.to_string())
        })?;
    let id = ContentId::parse(&id)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    match state.cache().evict(content_type, &id) {
        Ok(removed) => {
            info!(content_type = %content_type, id = %id, removed, "Manual cache eviction");
            Ok(Json(RemovedResponse { removed }))
        }
        Err(e) => Err(ErrorResponse::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            e.to_string(),
        )),
    }
}
