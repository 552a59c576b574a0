//! HTTP transport for the legacy upstream.
//!
//! This module provides a `Transport` implementation backed by `reqwest`,
//! with a per-call timeout and a cheap `/health` probe endpoint.
//!
//! # Requirements
//!
//! - Network access to the upstream's base URL
//! - The upstream exposing some cheap liveness endpoint for probing

use crate::core::{
    FetchError, RequestMethod, RequestSpec, Transport, TransportError, UpstreamResponse,
};

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Name of the upstream, used in errors and log events.
    pub name: String,

    /// Base URL of the upstream, e.g. `http://legacy.internal:8080`.
    pub base_url: String,

    /// Per-call timeout.
    pub timeout: Duration,

    /// Path of the cheap endpoint used as the half-open probe.
    pub health_path: String,
}

impl HttpTransportConfig {
    /// Creates a new configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            name: "legacy".to_string(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
            health_path: "/health".to_string(),
        }
    }

    /// Sets the upstream name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the health-probe path.
    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }
}

/// A `reqwest`-backed [`Transport`].
///
/// Non-success statuses are mapped to [`TransportError::HttpStatus`] and
/// response bodies are decoded as JSON. The configured timeout applies to
/// every call, including health probes.
///
/// # Example
///
/// ```rust,ignore
/// use legacybridge::transport::{HttpTransport, HttpTransportConfig};
/// use std::time::Duration;
///
/// let transport = HttpTransport::new(
///     HttpTransportConfig::new("http://legacy.internal:8080")
///         .with_timeout(Duration::from_secs(5)),
/// )?;
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    config: HttpTransportConfig,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a new HTTP transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: HttpTransportConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    fn url_for(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    fn map_send_error(&self, endpoint: &str, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::timeout(endpoint, self.config.timeout)
        } else {
            TransportError::aborted(endpoint, error.to_string())
        }
    }

    async fn send(&self, endpoint: &str, request: reqwest::RequestBuilder) -> Result<UpstreamResponse, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.map_send_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::http_status(endpoint, status.as_u16()));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| TransportError::aborted(endpoint, format!("invalid JSON body: {e}")))?;

        Ok(UpstreamResponse::new(status.as_u16(), data))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn call(&self, spec: &RequestSpec) -> Result<UpstreamResponse, TransportError> {
        let url = self.url_for(&spec.path);
        tracing::debug!(
            upstream = %self.config.name,
            method = spec.method.as_str(),
            path = %spec.path,
            "issuing upstream call"
        );

        let request = match spec.method {
            RequestMethod::Get => self.client.get(&url),
            RequestMethod::Post => {
                let builder = self.client.post(&url);
                match &spec.body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
        };

        self.send(&spec.path, request).await
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        let url = self.url_for(&self.config.health_path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(&self.config.health_path, e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::http_status(
                &self.config.health_path,
                status.as_u16(),
            ))
        }
    }
}
