//! Register gateway source.
//!
//! Reads each signal with `GET {url}/tags/{address}`, expecting a body of
//! the form `{"value": <number | bool>}`.

use super::{SignalSource, SignalSpec, SignalValue, SourceError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TagReading {
    value: SignalValue,
}

/// Source backed by an HTTP register gateway in front of the PLC.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    /// Create a source for the gateway at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(Self::with_client(base_url, timeout, client))
    }

    /// Create a source with a custom HTTP client (for testing).
    pub fn with_client(
        base_url: impl Into<String>,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn tag_url(&self, address: &str) -> String {
        format!("{}/tags/{}", self.base_url, address)
    }

    fn classify_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout(self.timeout.as_millis() as u64)
        } else {
            SourceError::Unavailable(e.to_string())
        }
    }
}

#[async_trait]
impl SignalSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn read(&self, signal: &SignalSpec) -> Result<SignalValue, SourceError> {
        let response = self
            .client
            .get(self.tag_url(&signal.address))
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::UnknownAddress(signal.address.clone()));
        }
        if !status.is_success() {
            return Err(SourceError::Http(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify_error(e))?;
        let reading: TagReading =
            serde_json::from_str(&body).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(reading.value)
    }
}
