//! Retrying request executor.
//!
//! Performs one logical call against the transport, applying circuit
//! breaker gating and bounded retries with exponential backoff.

use crate::circuit_breaker::CircuitBreaker;
use crate::core::{ArcTransport, FetchError, RequestSpec, UpstreamResponse};
use crate::retry::backoff::delay_for_attempt;

use std::sync::Arc;
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Number of retry attempts after the first call.
    pub max_retries: u32,

    /// Delay before the first retry; doubles per subsequent retry.
    pub initial_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(150),
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables retries: only the first attempt is made.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Sets the number of retry attempts after the first call.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the initial delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

/// Executes logical calls with breaker gating and bounded retries.
///
/// The breaker is consulted once at entry, not between retries; the
/// success or failure of the whole call is reported to the breaker exactly
/// once, at the terminal outcome. Intermediate retried failures report
/// nothing, so transient blips that eventually succeed never count toward
/// the failure threshold.
///
/// Dropping the returned future between suspension points abandons the
/// call without recording any outcome.
#[derive(Debug)]
pub struct RequestExecutor {
    transport: ArcTransport,
    breaker: Arc<CircuitBreaker>,
    config: RetryConfig,
}

impl RequestExecutor {
    /// Creates a new executor over the given transport and breaker.
    pub fn new(transport: ArcTransport, breaker: Arc<CircuitBreaker>, config: RetryConfig) -> Self {
        Self {
            transport,
            breaker,
            config,
        }
    }

    /// Returns the breaker this executor reports to.
    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Performs one logical call against the transport.
    ///
    /// If the circuit is open, exactly one health probe is attempted via
    /// the transport's `health_check`; if that does not flip the circuit
    /// out of open, the call fails fast with [`FetchError::CircuitOpen`]
    /// and the transport call is never issued; no retries in this case.
    ///
    /// Otherwise the call is attempted, with transient failures (timeouts,
    /// aborted connections, HTTP >= 500) retried up to `max_retries` times
    /// under exponential backoff, and permanent failures (4xx) surfaced
    /// immediately without consuming a retry.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<UpstreamResponse, FetchError> {
        if self.breaker.is_blocking() {
            let transport = &self.transport;
            self.breaker
                .probe(|| async move { transport.health_check().await.map(|()| true) })
                .await;

            if self.breaker.is_blocking() {
                self.breaker.note_rejection();
                let hint = self.breaker.opened_until().and_then(|until| {
                    until
                        .checked_duration_since(std::time::Instant::now())
                        .map(|remaining| format!("circuit may recover in {remaining:?}"))
                });
                tracing::debug!(
                    upstream = self.transport.name(),
                    "circuit open, failing fast"
                );
                return Err(FetchError::CircuitOpen {
                    upstream: self.transport.name().to_string(),
                    recovery_hint: hint,
                });
            }
        }

        let mut attempt: u32 = 0;
        loop {
            match self.transport.call(spec).await {
                Ok(response) => {
                    self.breaker.record_success();
                    return Ok(response);
                }

                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    let delay = delay_for_attempt(self.config.initial_delay, attempt);
                    tracing::debug!(
                        upstream = self.transport.name(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying transient upstream failure"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }

                Err(err) if err.is_transient() => {
                    self.breaker.record_failure();
                    return Err(FetchError::Transient {
                        attempts: attempt + 1,
                        source: err,
                    });
                }

                Err(err) => {
                    self.breaker.record_failure();
                    return Err(FetchError::Permanent { source: err });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit_breaker::CircuitBreakerConfig;
    use crate::core::TransportError;
    use crate::transport::MockTransport;
    use serde_json::json;
    use tokio::time::Instant;

    fn executor(transport: MockTransport, retry: RetryConfig) -> (Arc<MockTransport>, RequestExecutor) {
        let transport = Arc::new(transport);
        let breaker = Arc::new(CircuitBreaker::with_defaults());
        let exec = RequestExecutor::new(transport.clone(), breaker, retry);
        (transport, exec)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_then_succeeds() {
        let mock = MockTransport::new().with_default_data(json!({"id": "42"}));
        mock.push_failure(TransportError::http_status("/users/42", 500));
        mock.push_failure(TransportError::http_status("/users/42", 500));
        let (transport, exec) = executor(mock, RetryConfig::new().with_max_retries(2));

        let started = Instant::now();
        let response = exec.execute(&RequestSpec::get("/users/42")).await.unwrap();

        // Backoff waits 150ms then 300ms before the two retries.
        assert!(started.elapsed() >= Duration::from_millis(450));
        assert_eq!(response.data, json!({"id": "42"}));
        assert_eq!(transport.call_count(), 3);

        // One terminal outcome reported, not one per attempt.
        let metrics = exec.breaker().metrics();
        assert_eq!(metrics.total_calls, 1);
        assert_eq!(metrics.successes, 1);
        assert_eq!(metrics.failures, 0);
    }

    #[tokio::test]
    async fn test_permanent_failure_surfaces_without_retry() {
        let mock = MockTransport::new();
        mock.push_failure(TransportError::http_status("/users/1", 404));
        let (transport, exec) = executor(mock, RetryConfig::new().with_max_retries(2));

        let err = exec.execute(&RequestSpec::get("/users/1")).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, FetchError::Permanent { .. }));
        assert_eq!(transport.call_count(), 1);
        assert_eq!(exec.breaker().metrics().failures, 1);
        assert_eq!(exec.breaker().consecutive_failures(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_report_one_failure() {
        let mock = MockTransport::new();
        mock.push_failure(TransportError::timeout("/users/1", Duration::from_secs(5)));
        mock.push_failure(TransportError::http_status("/users/1", 502));
        mock.push_failure(TransportError::aborted("/users/1", "connection reset"));
        let (transport, exec) = executor(mock, RetryConfig::new().with_max_retries(2));

        let err = exec.execute(&RequestSpec::get("/users/1")).await.unwrap_err();
        match err {
            FetchError::Transient { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(source, TransportError::ConnectionAborted { .. }));
            }
            other => panic!("expected transient error, got {other:?}"),
        }
        assert_eq!(transport.call_count(), 3);

        // Exactly one failure recorded for the whole call.
        assert_eq!(exec.breaker().metrics().failures, 1);
        assert_eq!(exec.breaker().consecutive_failures(), 1);
    }

    #[tokio::test]
    async fn test_open_circuit_fails_fast_without_calling() {
        let transport = Arc::new(MockTransport::new());
        let breaker = Arc::new(CircuitBreaker::new(
            CircuitBreakerConfig::new()
                .with_failure_threshold(1)
                .with_reset_timeout(Duration::from_secs(10)),
        ));
        breaker.record_failure();
        let exec = RequestExecutor::new(transport.clone(), breaker, RetryConfig::default());

        let err = exec.execute(&RequestSpec::get("/users/1")).await.unwrap_err();
        assert!(err.is_circuit_open());
        assert_eq!(transport.call_count(), 0);
        assert_eq!(exec.breaker().metrics().rejected, 1);
    }

    #[tokio::test]
    async fn test_half_open_call_acts_as_trial() {
        let transport = Arc::new(MockTransport::new().with_default_data(json!({"ok": true})));
        let breaker = Arc::new(CircuitBreaker::new(
            CircuitBreakerConfig::new()
                .with_failure_threshold(1)
                .with_reset_timeout(Duration::from_millis(10)),
        ));
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(20));

        let exec = RequestExecutor::new(transport.clone(), breaker, RetryConfig::default());
        let response = exec.execute(&RequestSpec::get("/users/1")).await.unwrap();

        assert_eq!(response.data, json!({"ok": true}));
        assert!(exec.breaker().current_state().is_closed());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_retry_config() {
        let mock = MockTransport::new();
        mock.push_failure(TransportError::http_status("/users/1", 500));
        let (transport, exec) = executor(mock, RetryConfig::no_retry());

        let err = exec.execute(&RequestSpec::get("/users/1")).await.unwrap_err();
        assert!(matches!(err, FetchError::Transient { attempts: 1, .. }));
        assert_eq!(transport.call_count(), 1);
    }
}
