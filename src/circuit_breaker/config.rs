//! Circuit breaker configuration.

use std::time::Duration;

/// Configuration for a circuit breaker.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,

    /// How long the circuit stays open before a half-open probe is allowed.
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(10),
        }
    }
}

impl CircuitBreakerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure threshold. Values below 1 are clamped to 1.
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    /// Sets the reset timeout.
    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout = timeout;
        self
    }

    /// Creates a configuration that trips early and recovers slowly.
    ///
    /// Suited to upstreams where hammering a struggling service makes
    /// things worse: opens after 3 consecutive failures and stays open
    /// for 30 seconds.
    pub fn sensitive() -> Self {
        Self {
            failure_threshold: 3,
            reset_timeout: Duration::from_secs(30),
        }
    }

    /// Creates a configuration that tolerates more failures and probes
    /// again quickly.
    ///
    /// Suited to upstreams with frequent transient blips: opens after 10
    /// consecutive failures and allows a probe after 5 seconds.
    pub fn tolerant() -> Self {
        Self {
            failure_threshold: 10,
            reset_timeout: Duration::from_secs(5),
        }
    }
}
