//! Mock transport for testing.
//!
//! This module provides a configurable mock transport that can be used
//! in tests to simulate upstream outcomes without a real network.

use crate::core::{RequestSpec, Transport, TransportError, UpstreamResponse};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

/// A mock transport for testing purposes.
///
/// Outcomes are served from a scripted queue in push order; once the queue
/// is drained, every call succeeds with the configured default payload.
///
/// # Examples
///
/// ```rust
/// use legacybridge::transport::MockTransport;
/// use legacybridge::core::TransportError;
/// use serde_json::json;
///
/// // Fail twice with a 500, then serve the default payload.
/// let transport = MockTransport::new().with_default_data(json!({"id": "42"}));
/// transport.push_failure(TransportError::http_status("/users/42", 500));
/// transport.push_failure(TransportError::http_status("/users/42", 500));
/// ```
#[derive(Debug)]
pub struct MockTransport {
    /// Name of this upstream instance.
    name: String,
    /// Scripted outcomes, served in push order.
    script: Mutex<VecDeque<Result<UpstreamResponse, TransportError>>>,
    /// Payload served once the script is drained.
    default_data: Value,
    /// Simulated latency per call.
    latency: Option<Duration>,
    /// Number of `call` invocations.
    call_count: AtomicU64,
    /// Number of `health_check` invocations.
    health_check_count: AtomicU64,
    /// Whether health checks fail.
    unhealthy: RwLock<bool>,
}

impl MockTransport {
    /// Creates a new mock transport with default settings.
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            script: Mutex::new(VecDeque::new()),
            default_data: Value::Null,
            latency: None,
            call_count: AtomicU64::new(0),
            health_check_count: AtomicU64::new(0),
            unhealthy: RwLock::new(false),
        }
    }

    /// Sets the name of this upstream.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the payload served once the script is drained.
    pub fn with_default_data(mut self, data: Value) -> Self {
        self.default_data = data;
        self
    }

    /// Sets the simulated latency per call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queues a successful response.
    pub fn push_response(&self, response: UpstreamResponse) {
        self.lock_script().push_back(Ok(response));
    }

    /// Queues a failure.
    pub fn push_failure(&self, error: TransportError) {
        self.lock_script().push_back(Err(error));
    }

    /// Clears any queued outcomes.
    pub fn clear_script(&self) {
        self.lock_script().clear();
    }

    /// Returns the number of calls issued.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Returns the number of health checks issued.
    pub fn health_check_count(&self) -> u64 {
        self.health_check_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        *self
            .unhealthy
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = !healthy;
    }

    /// Makes health checks fail.
    pub fn make_unhealthy(&self) {
        self.set_healthy(false);
    }

    /// Makes health checks succeed again.
    pub fn make_healthy(&self) {
        self.set_healthy(true);
    }

    fn lock_script(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<Result<UpstreamResponse, TransportError>>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_unhealthy(&self) -> bool {
        *self
            .unhealthy
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, _spec: &RequestSpec) -> Result<UpstreamResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.lock_script().pop_front() {
            Some(outcome) => outcome,
            None => Ok(UpstreamResponse::ok(self.default_data.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        self.health_check_count.fetch_add(1, Ordering::Relaxed);

        if self.is_unhealthy() {
            Err(TransportError::aborted("/health", "mock upstream unhealthy"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_outcomes_in_order() {
        let transport = MockTransport::new().with_default_data(json!({"ok": true}));
        transport.push_failure(TransportError::http_status("/a", 500));
        transport.push_response(UpstreamResponse::ok(json!({"first": true})));

        let spec = RequestSpec::get("/a");
        assert!(transport.call(&spec).await.is_err());
        assert_eq!(
            transport.call(&spec).await.unwrap().data,
            json!({"first": true})
        );
        // Script drained; default payload from here on.
        assert_eq!(transport.call(&spec).await.unwrap().data, json!({"ok": true}));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_health_toggle() {
        let transport = MockTransport::new();
        assert!(transport.health_check().await.is_ok());

        transport.make_unhealthy();
        assert!(transport.health_check().await.is_err());

        transport.make_healthy();
        assert!(transport.health_check().await.is_ok());
        assert_eq!(transport.health_check_count(), 3);
    }
}
