use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::consts::WORD_NOT_FOUND;
use crate::error::ProxyError;

/// Error body returned by the dictionary API on a miss
#[derive(Debug, Deserialize)]
struct UpstreamMessage {
    message: Option<String>,
}

/// Client for the third-party dictionary API.
/// One outbound request per call: no retries, no caching.
#[derive(Debug, Clone)]
pub struct UpstreamDictionary {
    base_url: String,
    client: reqwest::Client,
}

impl UpstreamDictionary {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the entry URL for `word`, percent-encoding it as one path segment
    pub fn entry_url(&self, word: &str) -> Result<Url, ProxyError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProxyError::Transport(format!("Invalid upstream URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ProxyError::Transport("Upstream URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(word);

        Ok(url)
    }

    /// Fetch the raw JSON body for `word`.
    ///
    /// A 200 body is returned untouched. Any other status becomes
    /// [`ProxyError::Upstream`] carrying the upstream `message` field, or
    /// "Word not found" when the body has none.
    pub async fn fetch(&self, word: &str) -> Result<Bytes, ProxyError> {
        let url = self.entry_url(word)?;
        debug!(%url, "Forwarding lookup upstream");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        if status == StatusCode::OK {
            return Ok(body);
        }

        let message = serde_json::from_slice::<UpstreamMessage>(&body)
            .ok()
            .and_then(|m| m.message)
            .unwrap_or_else(|| WORD_NOT_FOUND.to_string());

        warn!(word, status = status.as_u16(), %message, "Upstream lookup failed");

        Err(ProxyError::Upstream { status, message })
    }
}
