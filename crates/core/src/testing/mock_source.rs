//! Mock stream source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::content::{ContentId, ContentType};
use crate::source::{SourceError, Stream, StreamSource};

/// Mock implementation of the StreamSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configured streams per content id
/// - Track requested ids for assertions
/// - Simulate failures and slow providers
///
/// # Example
///
/// ```rust,ignore
/// use streamhoard_core::testing::{MockSource, fixtures};
///
/// let source = MockSource::new("p1");
/// source.set_streams("tt1", vec![fixtures::magnet_stream("A", "aaa")]).await;
///
/// let streams = source.fetch(ContentType::Movie, &ContentId::parse("tt1")?).await;
/// assert_eq!(streams.len(), 1);
/// assert_eq!(source.recorded_ids().await, vec!["tt1"]);
/// ```
pub struct MockSource {
    name: String,
    /// Configured streams per content id.
    streams: Arc<RwLock<HashMap<String, Vec<Stream>>>>,
    /// Ids requested so far, in call order.
    requests: Arc<RwLock<Vec<String>>>,
    /// When set, every fetch fails.
    failing: Arc<RwLock<bool>>,
    /// Simulated latency per fetch.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl std::fmt::Debug for MockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new("mock")
    }
}

impl MockSource {
    /// Create a mock source with no configured streams.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            streams: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(false)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the streams returned for `id`.
    pub async fn set_streams(&self, id: &str, streams: Vec<Stream>) {
        self.streams.write().await.insert(id.to_string(), streams);
    }

    /// Make every subsequent fetch fail (or succeed again).
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// Delay every subsequent fetch.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Ids requested so far.
    pub async fn recorded_ids(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    /// Number of fetches made so far.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Forget recorded requests.
    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }
}

#[async_trait]
impl StreamSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_fetch(
        &self,
        _content_type: ContentType,
        id: &ContentId,
    ) -> Result<Vec<Stream>, SourceError> {
        self.requests.write().await.push(id.as_str().to_string());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.failing.read().await {
            return Err(SourceError::ConnectionFailed(format!(
                "{}: simulated failure",
                self.name
            )));
        }

        Ok(self
            .streams
            .read()
            .await
            .get(id.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source_returns_configured_streams() {
        let source = MockSource::new("p1");
        source.set_streams("tt1", vec![Stream::new("u", "A")]).await;

        let id = ContentId::parse("tt1").unwrap();
        let streams = source.try_fetch(ContentType::Movie, &id).await.unwrap();

        assert_eq!(streams.len(), 1);
        assert_eq!(source.recorded_ids().await, vec!["tt1"]);
    }

    #[tokio::test]
    async fn test_mock_source_failure_is_absorbed_by_fetch() {
        let source = MockSource::new("p1");
        source.set_streams("tt1", vec![Stream::new("u", "A")]).await;
        source.set_failing(true).await;

        let id = ContentId::parse("tt1").unwrap();
        assert!(source.try_fetch(ContentType::Movie, &id).await.is_err());
        assert!(source.fetch(ContentType::Movie, &id).await.is_empty());
        assert_eq!(source.request_count().await, 2);
    }
}
