//! HTTP add-on provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::content::{ContentId, ContentType};

use super::{ProviderResponse, SourceError, Stream, StreamSource};

/// A provider reached over the add-on HTTP protocol:
/// `GET {base}/stream/{type}/{id}.json`.
pub struct HttpSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    /// Create a source with its own HTTP client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self::with_client(client, base_url, timeout))
    }

    /// Create a source sharing an existing HTTP client.
    pub fn with_client(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            timeout,
        }
    }

    /// Build one source per configured base URL, all sharing a client.
    pub fn from_urls(urls: &[String], timeout: Duration) -> Result<Vec<Self>, SourceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(urls
            .iter()
            .map(|url| Self::with_client(client.clone(), url, timeout))
            .collect())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the listing URL for a content id.
    fn stream_url(&self, content_type: ContentType, id: &ContentId) -> String {
        format!("{}/stream/{}/{}.json", self.base_url, content_type, id)
    }
}

/// Strip a trailing `/` and a `/manifest.json` suffix, which is how add-on
/// URLs are usually shared.
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/manifest.json")
        .unwrap_or(trimmed)
        .to_string()
}

#[async_trait]
impl StreamSource for HttpSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn try_fetch(
        &self,
        content_type: ContentType,
        id: &ContentId,
    ) -> Result<Vec<Stream>, SourceError> {
        let url = self.stream_url(content_type, id);
        debug!(url = %url, "Fetching provider streams");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body: ProviderResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::InvalidResponse(e.to_string())
            }
        })?;

        debug!(
            provider = %self.base_url,
            id = %id,
            streams = body.streams.len(),
            "Provider fetch complete"
        );

        Ok(body.streams)
    }
}
