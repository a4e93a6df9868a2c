use std::sync::Arc;
use streamhoard_core::{CacheCoordinator, Config, SanitizedConfig, StreamCache};

/// Shared application state
pub struct AppState {
    config: Config,
    coordinator: CacheCoordinator,
    cache: Arc<dyn StreamCache>,
}

impl AppState {
    pub fn new(config: Config, coordinator: CacheCoordinator, cache: Arc<dyn StreamCache>) -> Self {
        Self {
            config,
            coordinator,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn coordinator(&self) -> &CacheCoordinator {
        &self.coordinator
    }

    /// Direct cache access for the admin endpoints.
    pub fn cache(&self) -> &dyn StreamCache {
        self.cache.as_ref()
    }
}
