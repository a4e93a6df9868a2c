use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{RequestLog, RequestLogError};

/// SQLite-backed request log.
///
/// May share a database file with the stream cache; each store holds its
/// own connection.
pub struct SqliteRequestLog {
    conn: Mutex<Connection>,
}

impl SqliteRequestLog {
    /// Open (or create) the request log at `path`.
    pub fn new(path: &Path) -> Result<Self, RequestLogError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory request log (useful for testing).
    pub fn in_memory() -> Result<Self, RequestLogError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), RequestLogError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS request_log (
                title_id TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_request_log_title_timestamp
                ON request_log(title_id, timestamp);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RequestLogError> {
        self.conn
            .lock()
            .map_err(|e| RequestLogError::Database(format!("connection lock poisoned: {}", e)))
    }
}

impl RequestLog for SqliteRequestLog {
    fn append(&self, title_id: &str, at: DateTime<Utc>) -> Result<(), RequestLogError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO request_log (title_id, timestamp) VALUES (?, ?)",
            params![title_id, at.timestamp_millis()],
        )?;
        Ok(())
    }

    fn count_between(
        &self,
        title_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<u64, RequestLogError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM request_log WHERE title_id = ? AND timestamp >= ? AND timestamp <= ?",
            params![title_id, since.timestamp_millis(), until.timestamp_millis()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn purge(&self, title_id: &str) -> Result<u64, RequestLogError> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM request_log WHERE title_id = ?",
            params![title_id],
        )?;
        Ok(removed as u64)
    }
}
