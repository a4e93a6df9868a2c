use std::time::Duration;

use rand::seq::SliceRandom;
use thiserror::Error;

use crate::cache::CacheError;
use crate::config::Config;
use crate::frequency::FrequencyPolicy;
use crate::source::Stream;

/// How the final stream list is ordered before it is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Uniformly random order.
    Shuffle,
    /// Streams with `cached = true` first, otherwise stored order.
    CachedFirst,
}

impl OrderingPolicy {
    pub fn from_randomize(randomize: bool) -> Self {
        if randomize {
            OrderingPolicy::Shuffle
        } else {
            OrderingPolicy::CachedFirst
        }
    }

    pub fn apply(self, mut streams: Vec<Stream>) -> Vec<Stream> {
        match self {
            OrderingPolicy::Shuffle => streams.shuffle(&mut rand::thread_rng()),
            // sort_by_key is stable; false sorts before true.
            OrderingPolicy::CachedFirst => streams.sort_by_key(|s| !s.cached),
        }
        streams
    }
}

/// Immutable settings for the cache coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    pub ordering: OrderingPolicy,
    pub eviction: FrequencyPolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingPolicy::CachedFirst,
            eviction: FrequencyPolicy::default(),
        }
    }
}

impl From<&Config> for CoordinatorConfig {
    fn from(config: &Config) -> Self {
        Self {
            ordering: OrderingPolicy::from_randomize(config.cache.randomize_streams),
            eviction: FrequencyPolicy {
                window: Duration::from_secs(config.cache.eviction_window_secs),
                threshold: config.cache.eviction_threshold,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("cache read failed: {0}")]
    Cache(#[from] CacheError),
}
