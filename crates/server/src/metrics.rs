//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the streamhoard server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Cache size (collected dynamically on scrape)
//! - Core metrics (cache lookups, evictions, providers, affinity)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "streamhoard_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamhoard_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "streamhoard_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Cache Metrics (collected dynamically)
// =============================================================================

/// Cached ids by content type.
pub static CACHE_ENTRIES: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("streamhoard_cache_entries", "Number of cached stream lists"),
        &["content_type"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Cache
    registry.register(Box::new(CACHE_ENTRIES.clone())).unwrap();

    // Core metrics (cache coordinator, providers, affinity)
    for metric in streamhoard_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the cache gauges reflect the store.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    match state.cache().stats() {
        Ok(stats) => {
            CACHE_ENTRIES
                .with_label_values(&["movie"])
                .set(stats.movie_entries as i64);
            CACHE_ENTRIES
                .with_label_values(&["series"])
                .set(stats.series_entries as i64);
        }
        Err(e) => warn!(error = %e, "Failed to read cache stats for metrics"),
    }
}

/// Matches the content id segment of stream and cache-admin paths.
static ID_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/stream/[^/]+|/api/v1/cache/[^/]+)/[^/]+$").unwrap());

/// Normalize a path for metric labels (replace content ids with a placeholder).
pub fn normalize_path(path: &str) -> String {
    ID_SEGMENT.replace(path, "$1/{id}").to_string()
}
