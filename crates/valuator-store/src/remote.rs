//! HTTP store implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument};
use valuator_core::{Result, Store, ValuatorError};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Store backed by a remote key/value service.
///
/// Reads are `GET {base_url}/{key}` and writes are `PUT {base_url}/{key}` with
/// the raw bytes as body. A `404` on read maps to [`ValuatorError::NotFound`].
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteStore {
    /// Create a store talking to `base_url`.
    ///
    /// # Errors
    /// Returns [`ValuatorError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ValuatorError::Network(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a store with a custom HTTP client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl Store for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self))]
    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let url = self.url(key);
        debug!("Fetching store entry: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ValuatorError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ValuatorError::NotFound(key.to_string()));
        }

        if !response.status().is_success() {
            return Err(ValuatorError::Persistence(format!(
                "HTTP {} for {}",
                response.status(),
                key
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ValuatorError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let url = self.url(key);
        debug!("Writing store entry: {}", url);

        let response = self
            .client
            .put(&url)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| ValuatorError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ValuatorError::Persistence(format!(
                "HTTP {} for {}",
                response.status(),
                key
            )));
        }
        Ok(())
    }
}
