//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Cache coordinator (lookups, evictions, store write failures)
//! - Upstream providers (fetch results and latency)
//! - Affinity resolver (lookup outcomes)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

// =============================================================================
// Cache
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamhoard_cache_lookups_total", "Total stream cache lookups"),
        &["result"], // "hit", "miss"
    )
    .unwrap()
});

/// Frequency-triggered evictions by content type.
pub static CACHE_EVICTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamhoard_cache_evictions_total",
            "Total frequency-triggered cache evictions",
        ),
        &["content_type"],
    )
    .unwrap()
});

/// Failed store writes, which are logged and otherwise ignored.
pub static CACHE_WRITE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamhoard_store_write_failures_total",
            "Total failed writes to the cache or request log",
        ),
        &["operation"], // "put", "record", "evict", "purge"
    )
    .unwrap()
});

// =============================================================================
// Providers
// =============================================================================

/// Provider fetches by result.
pub static PROVIDER_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamhoard_provider_fetches_total",
            "Total upstream provider fetches",
        ),
        &["result"], // "ok", "timeout", "error"
    )
    .unwrap()
});

/// Provider fetch duration in seconds.
pub static PROVIDER_FETCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "streamhoard_provider_fetch_duration_seconds",
            "Duration of upstream provider fetches",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0]),
    )
    .unwrap()
});

// =============================================================================
// Affinity
// =============================================================================

/// Affinity lookups by result.
pub static AFFINITY_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamhoard_affinity_lookups_total",
            "Total affinity resolver lookups",
        ),
        &["result"], // "cached", "not_cached", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(CACHE_EVICTIONS.clone()),
        Box::new(CACHE_WRITE_FAILURES.clone()),
        Box::new(PROVIDER_FETCHES.clone()),
        Box::new(PROVIDER_FETCH_DURATION.clone()),
        Box::new(AFFINITY_LOOKUPS.clone()),
    ]
}
