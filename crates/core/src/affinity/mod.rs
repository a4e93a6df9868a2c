//! Cache-affinity resolution for magnet streams.
//!
//! An affinity resolver answers whether a magnet locator already has a
//! direct, immediately playable URL (typically a debrid service). Streams
//! with a positive answer get that URL and `cached = true`; every other
//! stream ends up with `cached = false`. Resolver failures are absorbed.

mod http;
mod none;

pub use http::HttpAffinityResolver;
pub use none::NoneAffinityResolver;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics::AFFINITY_LOOKUPS;
use crate::source::Stream;

/// Errors from an affinity lookup.
#[derive(Debug, Error)]
pub enum AffinityError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("resolver returned HTTP {0}")]
    Status(u16),

    #[error("resolver not configured: {0}")]
    NotConfigured(String),
}

/// External service mapping magnet locators to direct URLs.
#[async_trait]
pub trait AffinityResolver: Send + Sync {
    /// Resolver name for logs.
    fn name(&self) -> &'static str;

    /// Look up a magnet locator. `Ok(None)` means "not cached".
    async fn lookup(&self, magnet_url: &str) -> Result<Option<String>, AffinityError>;
}

/// Resolve affinity for every stream concurrently. Order is preserved.
pub async fn resolve_affinity(resolver: &dyn AffinityResolver, streams: Vec<Stream>) -> Vec<Stream> {
    let lookups = streams
        .into_iter()
        .map(|stream| resolve_one(resolver, stream));
    join_all(lookups).await
}

async fn resolve_one(resolver: &dyn AffinityResolver, mut stream: Stream) -> Stream {
    if !stream.is_magnet() {
        stream.cached = false;
        return stream;
    }

    let magnet = stream.url.clone().unwrap_or_default();
    match resolver.lookup(&magnet).await {
        Ok(Some(direct_url)) => {
            AFFINITY_LOOKUPS.with_label_values(&["cached"]).inc();
            debug!(resolver = resolver.name(), "Magnet resolved to direct URL");
            stream.url = Some(direct_url);
            stream.cached = true;
        }
        Ok(None) => {
            AFFINITY_LOOKUPS.with_label_values(&["not_cached"]).inc();
            stream.cached = false;
        }
        Err(e) => {
            AFFINITY_LOOKUPS.with_label_values(&["error"]).inc();
            warn!(resolver = resolver.name(), error = %e, "Affinity lookup failed");
            stream.cached = false;
        }
    }
    stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAffinityResolver;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_resolve_replaces_cached_magnets() {
        let resolver = MockAffinityResolver::new();
        resolver
            .set_direct_url("magnet:?xt=urn:btih:aaa", "https://debrid/aaa.mkv")
            .await;

        let streams = vec![
            Stream::new("magnet:?xt=urn:btih:aaa", "A"),
            Stream::new("magnet:?xt=urn:btih:bbb", "B"),
            Stream::new("https://cdn/c.mkv", "C"),
        ];
        let resolved = resolve_affinity(&resolver, streams).await;

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].url.as_deref(), Some("https://debrid/aaa.mkv"));
        assert!(resolved[0].cached);
        assert_eq!(resolved[1].url.as_deref(), Some("magnet:?xt=urn:btih:bbb"));
        assert!(!resolved[1].cached);
        assert_eq!(resolved[2].title.as_deref(), Some("C"));
        assert!(!resolved[2].cached);
    }

    #[tokio::test]
    async fn test_lookups_run_concurrently() {
        let resolver = MockAffinityResolver::new();
        resolver.set_delay(Duration::from_millis(200)).await;
        let streams: Vec<Stream> = (0..6)
            .map(|i| Stream::new(format!("magnet:?xt=urn:btih:{}", i), "S"))
            .collect();

        let start = Instant::now();
        let resolved = resolve_affinity(&resolver, streams).await;

        // 6 sequential lookups would take 1.2s
        assert!(start.elapsed() < Duration::from_millis(600));
        assert_eq!(resolved.len(), 6);
        assert_eq!(resolver.recorded_lookups().await.len(), 6);
    }

    #[tokio::test]
    async fn test_only_magnets_are_looked_up() {
        let resolver = MockAffinityResolver::new();
        let streams = vec![
            Stream::new("https://cdn/a.mkv", "A"),
            Stream::new("magnet:?xt=urn:btih:bbb", "B"),
            Stream::default(),
        ];
        resolve_affinity(&resolver, streams).await;

        assert_eq!(
            resolver.recorded_lookups().await,
            vec!["magnet:?xt=urn:btih:bbb".to_string()]
        );
    }

    #[tokio::test]
    async fn test_resolver_failure_keeps_stream_uncached() {
        let resolver = MockAffinityResolver::new();
        resolver
            .set_direct_url("magnet:?xt=urn:btih:aaa", "https://debrid/aaa.mkv")
            .await;
        resolver.set_failing(true).await;

        let mut stream = Stream::new("magnet:?xt=urn:btih:aaa", "A");
        stream.cached = true;
        let resolved = resolve_affinity(&resolver, vec![stream]).await;

        assert_eq!(resolved[0].url.as_deref(), Some("magnet:?xt=urn:btih:aaa"));
        assert!(!resolved[0].cached);
    }

    #[tokio::test]
    async fn test_previously_cached_direct_url_is_reset() {
        let resolver = NoneAffinityResolver::new();
        let mut stream = Stream::new("https://debrid/aaa.mkv", "A");
        stream.cached = true;

        let resolved = resolve_affinity(&resolver, vec![stream]).await;
        assert!(!resolved[0].cached);
    }
}
