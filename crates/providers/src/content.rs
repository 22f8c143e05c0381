//! HTTP content source that fetches a session's narrative document.

use std::time::Duration;

use async_trait::async_trait;
use gofp_core::content::ContentSource;
use gofp_core::error::ContentError;
use gofp_core::session::SessionData;
use tracing::debug;

/// Fetches session content with a single GET request.
pub struct HttpContentSource {
    client: reqwest::Client,
}

impl HttpContentSource {
    pub fn new(timeout: Duration) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContentError::Network {
                uri: String::new(),
                reason: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, uri: &str) -> Result<SessionData, ContentError> {
        debug!(uri, "Fetching session content");

        let network = |e: reqwest::Error| ContentError::Network {
            uri: uri.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(uri).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                uri: uri.to_string(),
                status_code: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ContentError::Malformed(e.to_string()))?;

        SessionData::from_json(body)
    }
}
