//! Transport collaborators for the DWD pollen endpoint
//!
//! The clients talk to the network through a small source seam so the
//! orchestration logic stays testable with scripted payloads. Both
//! implementations map network failures, non-2xx statuses, and malformed
//! bodies into [`PollenflugError::Transport`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::PollenflugError;
use crate::models::api::ApiPayload;
use crate::Result;

/// Blocking payload source
pub trait PollenSource {
    /// Fetch and parse one report; a single attempt, no retries
    fn fetch(&self) -> Result<ApiPayload>;
}

/// Async payload source
#[async_trait]
pub trait AsyncPollenSource: Send + Sync {
    /// Fetch and parse one report; a single attempt, no retries
    async fn fetch(&self) -> Result<ApiPayload>;
}

/// Blocking source over `reqwest::blocking`
pub struct HttpPollenSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpPollenSource {
    /// Source for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pollenflug/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PollenflugError::transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl PollenSource for HttpPollenSource {
    fn fetch(&self) -> Result<ApiPayload> {
        debug!("Fetching pollen report from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| PollenflugError::transport(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| PollenflugError::transport(format!("bad response status: {e}")))?;
        response
            .json()
            .map_err(|e| PollenflugError::transport(format!("malformed report body: {e}")))
    }
}

/// Async source over `reqwest`
pub struct AsyncHttpPollenSource {
    client: reqwest::Client,
    url: String,
}

impl AsyncHttpPollenSource {
    /// Source for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pollenflug/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PollenflugError::transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AsyncPollenSource for AsyncHttpPollenSource {
    async fn fetch(&self) -> Result<ApiPayload> {
        debug!("Fetching pollen report from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| PollenflugError::transport(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| PollenflugError::transport(format!("bad response status: {e}")))?;
        response
            .json()
            .await
            .map_err(|e| PollenflugError::transport(format!("malformed report body: {e}")))
    }
}
