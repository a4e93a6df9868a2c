//! Mock affinity resolver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::affinity::{AffinityError, AffinityResolver};

/// Mock implementation of the AffinityResolver trait.
///
/// Magnets registered with [`set_direct_url`](Self::set_direct_url) resolve
/// to that URL; every other magnet is "not cached".
pub struct MockAffinityResolver {
    direct_urls: Arc<RwLock<HashMap<String, String>>>,
    lookups: Arc<RwLock<Vec<String>>>,
    failing: Arc<RwLock<bool>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockAffinityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAffinityResolver {
    pub fn new() -> Self {
        Self {
            direct_urls: Arc::new(RwLock::new(HashMap::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(false)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Report `magnet` as cached with `direct_url`.
    pub async fn set_direct_url(&self, magnet: &str, direct_url: &str) {
        self.direct_urls
            .write()
            .await
            .insert(magnet.to_string(), direct_url.to_string());
    }

    /// Make every subsequent lookup fail.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// Delay every lookup by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Magnets looked up so far.
    pub async fn recorded_lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }
}

#[async_trait]
impl AffinityResolver for MockAffinityResolver {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn lookup(&self, magnet_url: &str) -> Result<Option<String>, AffinityError> {
        self.lookups.write().await.push(magnet_url.to_string());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.failing.read().await {
            return Err(AffinityError::Status(503));
        }

        Ok(self.direct_urls.read().await.get(magnet_url).cloned())
    }
}
