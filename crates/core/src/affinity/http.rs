//! HTTP affinity resolver (debrid-style availability endpoint).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AffinityConfig;

use super::{AffinityError, AffinityResolver};

/// Resolver backed by `POST {endpoint}` with a bearer token.
///
/// Request body: `{"torrent": "<magnet>"}`.
/// Response body: `{"cached": bool, "direct_url": "<url>"}`.
pub struct HttpAffinityResolver {
    client: Client,
    endpoint: String,
    api_token: String,
}

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    torrent: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    cached: bool,
    #[serde(default)]
    direct_url: Option<String>,
}

impl HttpAffinityResolver {
    pub fn new(config: AffinityConfig) -> Result<Self, AffinityError> {
        if config.endpoint.is_empty() {
            return Err(AffinityError::NotConfigured(
                "affinity endpoint is required".to_string(),
            ));
        }
        if config.api_token.is_empty() {
            return Err(AffinityError::NotConfigured(
                "affinity API token is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_token: config.api_token,
        })
    }
}

#[async_trait]
impl AffinityResolver for HttpAffinityResolver {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn lookup(&self, magnet_url: &str) -> Result<Option<String>, AffinityError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&LookupRequest {
                torrent: magnet_url,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AffinityError::Status(status.as_u16()));
        }

        let body: LookupResponse = response.json().await?;
        debug!(cached = body.cached, "Affinity lookup complete");

        Ok(match body.direct_url {
            Some(url) if body.cached && !url.is_empty() => Some(url),
            _ => None,
        })
    }
}
