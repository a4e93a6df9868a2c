//! Types shared by stream sources.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::content::{ContentId, ContentType};
use crate::metrics::{PROVIDER_FETCHES, PROVIDER_FETCH_DURATION};

/// A single playable result as served by a provider.
///
/// Only `url`, `title` and `cached` are interpreted; every other field the
/// provider sends (`name`, `infoHash`, `behaviorHints`, ...) is carried
/// through caching and output untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stream {
    /// Playable locator, possibly a magnet link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether a direct, immediately playable URL is known.
    #[serde(default)]
    pub cached: bool,
    /// Provider-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stream {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Identity used for deduplication: `(url, title)` with missing fields
    /// read as empty strings.
    pub fn dedup_key(&self) -> (&str, &str) {
        (
            self.url.as_deref().unwrap_or(""),
            self.title.as_deref().unwrap_or(""),
        )
    }

    /// Whether the url is a magnet-style locator.
    pub fn is_magnet(&self) -> bool {
        self.url
            .as_deref()
            .map(|u| u.contains("magnet:"))
            .unwrap_or(false)
    }
}

/// Body of a provider's `/stream/{type}/{id}.json` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub streams: Vec<Stream>,
}

/// Errors that can occur while fetching from a provider.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("provider request timed out")]
    Timeout,

    #[error("provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("provider returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("provider client could not be built: {0}")]
    Client(String),
}

impl SourceError {
    fn metric_label(&self) -> &'static str {
        match self {
            SourceError::Timeout => "timeout",
            _ => "error",
        }
    }
}

/// An upstream provider of streams.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Fetch one provider's listing, surfacing failures.
    async fn try_fetch(
        &self,
        content_type: ContentType,
        id: &ContentId,
    ) -> Result<Vec<Stream>, SourceError>;

    /// Fetch one provider's listing. Any failure yields an empty list.
    async fn fetch(&self, content_type: ContentType, id: &ContentId) -> Vec<Stream> {
        let start = Instant::now();
        let result = self.try_fetch(content_type, id).await;
        PROVIDER_FETCH_DURATION.observe(start.elapsed().as_secs_f64());

        match result {
            Ok(streams) => {
                PROVIDER_FETCHES.with_label_values(&["ok"]).inc();
                streams
            }
            Err(e) => {
                PROVIDER_FETCHES
                    .with_label_values(&[e.metric_label()])
                    .inc();
                if matches!(e, SourceError::Timeout) {
                    warn!(provider = self.name(), id = %id, "Provider timed out");
                } else {
                    warn!(provider = self.name(), id = %id, error = %e, "Provider fetch failed");
                }
                Vec::new()
            }
        }
    }
}
