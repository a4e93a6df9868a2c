use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::metrics_middleware;
use super::{cache, handlers, streams};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Admin API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Stream cache
        .route("/cache", delete(cache::clear_cache))
        .route("/cache/stats", get(cache::get_stats))
        .route("/cache/{content_type}/{id}", delete(cache::evict_entry))
        .with_state(Arc::clone(&state));

    // Add-on protocol routes
    Router::new()
        .route("/manifest.json", get(handlers::manifest))
        .route("/stream/{content_type}/{id}", get(streams::get_streams))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
