//! Testing utilities and mock implementations.
//!
//! Mocks for the external collaborators of the cache pipeline (stream
//! providers and the affinity resolver), so the coordinator and the HTTP
//! layer can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use streamhoard_core::testing::{MockSource, MockAffinityResolver, fixtures};
//!
//! let source = MockSource::new("p1");
//! source.set_streams("tt1", vec![fixtures::magnet_stream("A", "aaa")]).await;
//!
//! let resolver = MockAffinityResolver::new();
//! resolver.set_direct_url(&fixtures::magnet_url("aaa"), "https://debrid/a").await;
//! ```

mod mock_affinity;
mod mock_source;

pub use mock_affinity::MockAffinityResolver;
pub use mock_source::MockSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::source::Stream;

    /// Magnet locator for an info hash.
    pub fn magnet_url(info_hash: &str) -> String {
        format!("magnet:?xt=urn:btih:{}", info_hash)
    }

    /// A magnet stream as a torrent provider would return it.
    pub fn magnet_stream(title: &str, info_hash: &str) -> Stream {
        let mut stream = Stream::new(magnet_url(info_hash), title);
        stream
            .extra
            .insert("infoHash".to_string(), Value::String(info_hash.to_string()));
        stream
    }

    /// A stream with a direct HTTP URL.
    pub fn direct_stream(title: &str, url: &str) -> Stream {
        Stream::new(url, title)
    }

    /// A provider response body carrying `streams`.
    pub fn provider_response(streams: &[Stream]) -> Value {
        json!({ "streams": streams })
    }
}
