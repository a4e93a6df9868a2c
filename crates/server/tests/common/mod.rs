//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock providers and a mock affinity resolver injected, backed by a
//! SQLite database in a temporary directory.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use streamhoard_core::{
    config::{CacheConfig, DatabaseConfig},
    testing::{MockAffinityResolver, MockSource},
    Aggregator, AffinityResolver, CacheCoordinator, CacheEntry, CacheError, CacheStats, Config,
    ContentId, ContentType, CoordinatorConfig, RequestLog, SqliteRequestLog, SqliteStreamCache,
    Stream, StreamCache, StreamSource,
};
use streamhoard_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use streamhoard_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_stream_request() {
///     let fixture = TestFixture::new().await;
///     fixture.sources[0].set_streams("tt1", vec![fixtures::magnet_stream("A", "aaa")]).await;
///
///     let response = fixture.get("/stream/movie/tt1.json").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock providers, in configured order
    pub sources: Vec<Arc<MockSource>>,
    /// Mock affinity resolver
    pub resolver: Arc<MockAffinityResolver>,
    /// Stream cache shared with the router
    pub cache: Arc<dyn StreamCache>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            cache: CacheConfig {
                randomize_streams: false,
                eviction_threshold: test_config.eviction_threshold,
                eviction_window_secs: 3600,
            },
            ..Default::default()
        };

        // Create mocks
        let sources: Vec<Arc<MockSource>> = (0..test_config.provider_count)
            .map(|i| Arc::new(MockSource::new(&format!("provider-{}", i))))
            .collect();
        let resolver = Arc::new(MockAffinityResolver::new());

        // Create stores
        let cache: Arc<dyn StreamCache> = if test_config.broken_cache {
            Arc::new(BrokenCache)
        } else {
            Arc::new(SqliteStreamCache::new(&db_path).expect("Failed to create cache"))
        };
        let request_log: Arc<dyn RequestLog> =
            Arc::new(SqliteRequestLog::new(&db_path).expect("Failed to create request log"));

        let coordinator = CacheCoordinator::new(
            CoordinatorConfig::from(&config),
            Aggregator::new(
                sources
                    .iter()
                    .map(|s| Arc::clone(s) as Arc<dyn StreamSource>)
                    .collect(),
                Arc::clone(&resolver) as Arc<dyn AffinityResolver>,
            ),
            Arc::clone(&cache),
            request_log,
        );

        let state = Arc::new(AppState::new(config, coordinator, Arc::clone(&cache)));
        let router = create_router(state);

        Self {
            router,
            sources,
            resolver,
            cache,
            temp_dir,
        }
    }

    /// Total fetches across all mock providers.
    pub async fn provider_requests(&self) -> usize {
        let mut total = 0;
        for source in &self.sources {
            total += source.request_count().await;
        }
        total
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Number of mock providers
    pub provider_count: usize,
    /// Requests per hour that evict a title
    pub eviction_threshold: u32,
    /// Use a cache whose every operation fails
    pub broken_cache: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            provider_count: 2,
            eviction_threshold: 100,
            broken_cache: false,
        }
    }
}

impl TestConfig {
    /// Create config with a low eviction threshold.
    pub fn with_threshold(eviction_threshold: u32) -> Self {
        Self {
            eviction_threshold,
            ..Default::default()
        }
    }

    /// Create config with a cache that fails every operation.
    pub fn with_broken_cache() -> Self {
        Self {
            broken_cache: true,
            ..Default::default()
        }
    }
}

/// Cache that fails every operation, as a locked or corrupt database would.
pub struct BrokenCache;

impl StreamCache for BrokenCache {
    fn get(&self, _: ContentType, _: &ContentId) -> Result<Option<CacheEntry>, CacheError> {
        Err(CacheError::Database("database disk image is malformed".to_string()))
    }

    fn put(&self, _: ContentType, _: &ContentId, _: &[Stream]) -> Result<(), CacheError> {
        Err(CacheError::Database("database disk image is malformed".to_string()))
    }

    fn evict(&self, _: ContentType, _: &ContentId) -> Result<u64, CacheError> {
        Err(CacheError::Database("database disk image is malformed".to_string()))
    }

    fn stats(&self) -> Result<CacheStats, CacheError> {
        Err(CacheError::Database("database disk image is malformed".to_string()))
    }

    fn clear(&self) -> Result<u64, CacheError> {
        Err(CacheError::Database("database disk image is malformed".to_string()))
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
