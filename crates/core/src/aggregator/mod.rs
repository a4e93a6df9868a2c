//! Fan-out retrieval across all providers.
//!
//! For one request the aggregator queries every provider for the requested
//! id and, when the id is a series episode, for the next episode and the
//! first episode of the next season as well. All fetches run concurrently;
//! results are flattened in provider order, deduplicated, and passed through
//! cache-affinity resolution.

mod dedup;

pub use dedup::deduplicate_streams;

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::debug;

use crate::affinity::{resolve_affinity, AffinityResolver};
use crate::content::{ContentId, ContentType};
use crate::source::{Stream, StreamSource};

/// Merges stream listings from a fixed set of providers.
pub struct Aggregator {
    sources: Vec<Arc<dyn StreamSource>>,
    resolver: Arc<dyn AffinityResolver>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn StreamSource>>, resolver: Arc<dyn AffinityResolver>) -> Self {
        Self { sources, resolver }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Fetch, merge and deduplicate streams for `id` and its adjacent ids.
    pub async fn fetch_all(&self, content_type: ContentType, id: &ContentId) -> Vec<Stream> {
        let start = Instant::now();
        let ids = id.with_adjacent();

        // provider-major order: p1[id, next_ep, next_season], p2[...], ...
        let fetches = self
            .sources
            .iter()
            .flat_map(|source| ids.iter().map(move |target| source.fetch(content_type, target)));

        let merged: Vec<Stream> = join_all(fetches).await.into_iter().flatten().collect();
        let fetched = merged.len();

        let unique = deduplicate_streams(merged);
        let streams = self.resolve_affinity(unique).await;

        debug!(
            id = %id,
            providers = self.sources.len(),
            ids = ids.len(),
            fetched,
            unique = streams.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Aggregation complete"
        );

        streams
    }

    /// Run cache-affinity resolution on an existing list.
    pub async fn resolve_affinity(&self, streams: Vec<Stream>) -> Vec<Stream> {
        resolve_affinity(self.resolver.as_ref(), streams).await
    }
}
