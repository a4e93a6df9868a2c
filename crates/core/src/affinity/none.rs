use async_trait::async_trait;

use super::{AffinityError, AffinityResolver};

/// Resolver used when no affinity service is configured.
/// Every lookup answers "not cached".
pub struct NoneAffinityResolver;

impl NoneAffinityResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneAffinityResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AffinityResolver for NoneAffinityResolver {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn lookup(&self, _magnet_url: &str) -> Result<Option<String>, AffinityError> {
        Ok(None)
    }
}
