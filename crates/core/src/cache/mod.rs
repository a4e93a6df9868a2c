//! Stream cache - merged provider results keyed by content id.
//!
//! One row per content id. The content type is stored alongside the row
//! and filters reads, but it does not split the key space: a later write
//! for the same id with another type replaces the row.

mod sqlite;
mod types;

pub use sqlite::SqliteStreamCache;
pub use types::*;

use crate::content::{ContentId, ContentType};
use crate::source::Stream;

/// Trait for stream cache storage.
pub trait StreamCache: Send + Sync {
    /// Get the cached entry for `(content_type, id)`.
    fn get(&self, content_type: ContentType, id: &ContentId)
        -> Result<Option<CacheEntry>, CacheError>;

    /// Insert or replace the entry for `id`, stamping it with the current time.
    fn put(&self, content_type: ContentType, id: &ContentId, streams: &[Stream])
        -> Result<(), CacheError>;

    /// Evict cached entries for `id`.
    ///
    /// Series: only the exact id is removed. Movies: every row whose id
    /// contains the title id is removed, so stray variants sharing the title
    /// go with it.
    ///
    /// Returns the number of rows removed.
    fn evict(&self, content_type: ContentType, id: &ContentId) -> Result<u64, CacheError>;

    /// Get cache statistics.
    fn stats(&self) -> Result<CacheStats, CacheError>;

    /// Remove every cached entry. Returns the number of rows removed.
    fn clear(&self) -> Result<u64, CacheError>;
}
