//! SQLite-backed stream cache implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{CacheEntry, CacheError, CacheStats, StreamCache};
use crate::content::{ContentId, ContentType};
use crate::source::Stream;

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed stream cache.
///
/// Schema:
/// ```sql
/// CREATE TABLE stream_cache (
///     id TEXT PRIMARY KEY,
///     type TEXT NOT NULL,
///     streams TEXT NOT NULL,
///     timestamp INTEGER NOT NULL
/// );
/// ```
pub struct SqliteStreamCache {
    conn: Mutex<Connection>,
}

impl SqliteStreamCache {
    /// Create a new SQLite cache, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS stream_cache (
                id TEXT PRIMARY KEY,
                type TEXT NOT NULL,
                streams TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_stream_cache_timestamp ON stream_cache(timestamp);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|e| CacheError::Database(format!("connection lock poisoned: {}", e)))
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

impl StreamCache for SqliteStreamCache {
    fn get(
        &self,
        content_type: ContentType,
        id: &ContentId,
    ) -> Result<Option<CacheEntry>, CacheError> {
        let conn = self.lock()?;

        let row: Option<(String, String, i64)> = conn
            .query_row(
                "SELECT id, streams, timestamp FROM stream_cache WHERE id = ? AND type = ?",
                params![id.as_str(), content_type.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((content_id, streams_json, timestamp)) = row else {
            return Ok(None);
        };

        let streams: Vec<Stream> = serde_json::from_str(&streams_json)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        Ok(Some(CacheEntry {
            content_id,
            content_type,
            streams,
            written_at: millis_to_datetime(timestamp),
        }))
    }

    fn put(
        &self,
        content_type: ContentType,
        id: &ContentId,
        streams: &[Stream],
    ) -> Result<(), CacheError> {
        let streams_json =
            serde_json::to_string(streams).map_err(|e| CacheError::Serialization(e.to_string()))?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT OR REPLACE INTO stream_cache (id, type, streams, timestamp) VALUES (?, ?, ?, ?)",
            params![
                id.as_str(),
                content_type.as_str(),
                streams_json,
                Utc::now().timestamp_millis()
            ],
        )?;

        Ok(())
    }

    fn evict(&self, content_type: ContentType, id: &ContentId) -> Result<u64, CacheError> {
        let conn = self.lock()?;

        let removed = match content_type {
            // An empty title would match every row.
            ContentType::Movie if !id.title_id().is_empty() => conn.execute(
                "DELETE FROM stream_cache WHERE instr(id, ?) > 0",
                params![id.title_id()],
            )?,
            _ => conn.execute(
                "DELETE FROM stream_cache WHERE id = ?",
                params![id.as_str()],
            )?,
        };

        Ok(removed as u64)
    }

    fn stats(&self) -> Result<CacheStats, CacheError> {
        let conn = self.lock()?;

        let (total, movies, series, oldest, newest): (
            i64,
            i64,
            i64,
            Option<i64>,
            Option<i64>,
        ) = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN type = 'movie' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN type = 'series' THEN 1 ELSE 0 END), 0),
                    MIN(timestamp),
                    MAX(timestamp)
             FROM stream_cache",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )?;

        Ok(CacheStats {
            total_entries: total as u64,
            movie_entries: movies as u64,
            series_entries: series as u64,
            oldest_entry: oldest.map(millis_to_datetime),
            newest_entry: newest.map(millis_to_datetime),
        })
    }

    fn clear(&self) -> Result<u64, CacheError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM stream_cache", [])?;
        Ok(removed as u64)
    }
}
