//! Types for the stream cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ContentType;
use crate::source::Stream;

/// A cached, merged stream list for one content id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content id (storage key).
    pub content_id: String,
    /// Type the entry was written with.
    pub content_type: ContentType,
    /// Merged streams in stored order.
    pub streams: Vec<Stream>,
    /// When the entry was last written.
    pub written_at: DateTime<Utc>,
}

/// Cache statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total cached ids.
    pub total_entries: u64,
    /// Entries written as movies.
    pub movie_entries: u64,
    /// Entries written as series episodes.
    pub series_entries: u64,
    /// Oldest write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<DateTime<Utc>>,
    /// Most recent write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Errors for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for CacheError {
    fn from(e: rusqlite::Error) -> Self {
        CacheError::Database(e.to_string())
    }
}
