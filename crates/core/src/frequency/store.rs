use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestLogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Window out of range: {0:?}")]
    WindowOutOfRange(Duration),
}

impl From<rusqlite::Error> for RequestLogError {
    fn from(e: rusqlite::Error) -> Self {
        RequestLogError::Database(e.to_string())
    }
}

/// Append-only log of request timestamps per title.
pub trait RequestLog: Send + Sync {
    /// Append one request for `title_id` at `at`.
    fn append(&self, title_id: &str, at: DateTime<Utc>) -> Result<(), RequestLogError>;

    /// Count requests for `title_id` with `since <= timestamp <= until`.
    fn count_between(
        &self,
        title_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<u64, RequestLogError>;

    /// Delete every request for `title_id`. Returns the number removed.
    fn purge(&self, title_id: &str) -> Result<u64, RequestLogError>;
}
