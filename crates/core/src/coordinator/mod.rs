//! Read-through cache in front of the aggregator.
//!
//! Per request:
//! 1. record the request against the title
//! 2. when the title crossed the frequency threshold and a cached row
//!    exists, evict it and purge the title's request log
//! 3. serve from cache (affinity re-resolved), or aggregate and populate
//!    the cache for the requested id and its adjacent episodes
//! 4. order the result
//!
//! Only a failing cache read fails the request. Failed writes are logged
//! and counted.

mod types;

pub use types::*;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::cache::StreamCache;
use crate::content::{ContentId, ContentType};
use crate::frequency::{FrequencyTracker, RequestLog};
use crate::metrics::{CACHE_EVICTIONS, CACHE_LOOKUPS, CACHE_WRITE_FAILURES};
use crate::source::Stream;

pub struct CacheCoordinator {
    config: CoordinatorConfig,
    aggregator: Aggregator,
    cache: Arc<dyn StreamCache>,
    tracker: FrequencyTracker,
}

impl CacheCoordinator {
    pub fn new(
        config: CoordinatorConfig,
        aggregator: Aggregator,
        cache: Arc<dyn StreamCache>,
        request_log: Arc<dyn RequestLog>,
    ) -> Self {
        let tracker = FrequencyTracker::new(request_log, config.eviction);
        Self {
            config,
            aggregator,
            cache,
            tracker,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Resolve the ordered stream list for `id`.
    pub async fn resolve(
        &self,
        content_type: ContentType,
        id: &ContentId,
    ) -> Result<Vec<Stream>, CoordinatorError> {
        let title_id = id.title_id();

        if let Err(e) = self.tracker.record(title_id) {
            CACHE_WRITE_FAILURES.with_label_values(&["record"]).inc();
            warn!(title_id = %title_id, error = %e, "Failed to record request");
        }

        self.evict_if_hot(content_type, id)?;

        let streams = match self.cache.get(content_type, id)? {
            Some(entry) => {
                CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                debug!(
                    id = %id,
                    streams = entry.streams.len(),
                    written_at = %entry.written_at,
                    "Cache hit"
                );
                self.aggregator.resolve_affinity(entry.streams).await
            }
            None => {
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                debug!(id = %id, "Cache miss, fetching from providers");
                let streams = self.aggregator.fetch_all(content_type, id).await;
                self.populate(content_type, id, &streams);
                streams
            }
        };

        Ok(self.config.ordering.apply(streams))
    }

    /// Evict the cached row for `id` when its title is requested too often.
    ///
    /// Nothing is evicted or purged when no row exists, so the gate stays
    /// open until a row is written and the next request removes it.
    /// A failed eviction skips the purge so the next request retries it.
    fn evict_if_hot(&self, content_type: ContentType, id: &ContentId) -> Result<(), CoordinatorError> {
        let title_id = id.title_id();

        let hot = match self.tracker.should_evict(title_id) {
            Ok(hot) => hot,
            Err(e) => {
                warn!(title_id = %title_id, error = %e, "Failed to count recent requests");
                false
            }
        };
        if !hot {
            return Ok(());
        }

        if self.cache.get(content_type, id)?.is_none() {
            debug!(id = %id, "Request threshold reached but nothing cached");
            return Ok(());
        }

        match self.cache.evict(content_type, id) {
            Ok(removed) => {
                CACHE_EVICTIONS
                    .with_label_values(&[content_type.as_str()])
                    .inc();
                info!(
                    id = %id,
                    content_type = %content_type,
                    removed,
                    threshold = self.config.eviction.threshold,
                    "Evicted frequently requested entry"
                );
            }
            Err(e) => {
                CACHE_WRITE_FAILURES.with_label_values(&["evict"]).inc();
                warn!(id = %id, error = %e, "Failed to evict cache entry");
                return Ok(());
            }
        }

        match self.tracker.purge(title_id) {
            Ok(purged) => debug!(title_id = %title_id, purged, "Purged request log"),
            Err(e) => {
                CACHE_WRITE_FAILURES.with_label_values(&["purge"]).inc();
                warn!(title_id = %title_id, error = %e, "Failed to purge request log");
            }
        }

        Ok(())
    }

    /// Store `streams` under `id` and, for episodes, its adjacent ids.
    fn populate(&self, content_type: ContentType, id: &ContentId, streams: &[Stream]) {
        for key in id.with_adjacent() {
            if let Err(e) = self.cache.put(content_type, &key, streams) {
                CACHE_WRITE_FAILURES.with_label_values(&["put"]).inc();
                warn!(id = %key, error = %e, "Failed to write cache entry");
            }
        }
    }
}
