//! Add-on stream endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use streamhoard_core::{ContentId, ContentType, Stream};
use tracing::error;

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<Stream>,
}

/// GET /stream/{content_type}/{id}.json
///
/// Unknown content types are 404. A failing cache read is the only 500.
pub async fn get_streams(
    State(state): State<Arc<AppState>>,
    Path((content_type, id)): Path<(String, String)>,
) -> Result<Json<StreamsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let content_type: ContentType = content_type
        .parse()
        .map_err(|e: streamhoard_core::ContentError| {
            ErrorResponse::with_status(StatusCode::NOT_FOUND, e.to_string())
        })?;

    let raw = id.strip_suffix(".json").unwrap_or(&id);
    let id = ContentId::parse(raw)
        .map_err(|e| ErrorResponse::with_status(StatusCode::NOT_FOUND, e.to_string()))?;

    match state.coordinator().resolve(content_type, &id).await {
        Ok(streams) => Ok(Json(StreamsResponse { streams })),
        Err(e) => {
            error!(content_type = %content_type, id = %id, error = %e, "Failed to resolve streams");
            Err(ErrorResponse::with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
    }
}
