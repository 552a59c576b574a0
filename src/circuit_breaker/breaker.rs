//! Circuit breaker implementation.

use crate::circuit_breaker::config::CircuitBreakerConfig;
use crate::circuit_breaker::state::{BreakerMetrics, BreakerRecord, CircuitState};
use crate::core::TransportError;

use std::future::Future;
use std::sync::Mutex;
use std::time::Instant;

/// A circuit breaker guarding one upstream.
///
/// The breaker tracks consecutive failures and decides, at any instant,
/// whether the upstream should be called. It is the single shared mutable
/// resource in the client: every concurrent call against the same client
/// instance reads and reports to the same breaker.
///
/// # States
///
/// - **Closed**: normal operation; failures are counted.
/// - **Open**: the upstream is assumed down; calls are rejected until the
///   reset timeout elapses.
/// - **Half-Open**: the reset timeout has elapsed; a single probe may test
///   whether the upstream recovered.
///
/// The `Open -> HalfOpen` transition is a read-time derivation: it is
/// applied lazily, under the lock, whenever state is queried, so every
/// reader observes the transitioned state consistently. There is no
/// background timer.
///
/// # Example
///
/// ```rust
/// use legacybridge::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
/// use std::time::Duration;
///
/// let breaker = CircuitBreaker::new(
///     CircuitBreakerConfig::new()
///         .with_failure_threshold(3)
///         .with_reset_timeout(Duration::from_secs(10)),
/// );
///
/// assert!(!breaker.is_blocking());
/// ```
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Configuration.
    config: CircuitBreakerConfig,
    /// The mutable record; every read and transition is one critical section.
    record: Mutex<BreakerRecord>,
    /// Behavior counters.
    metrics: Mutex<BreakerMetrics>,
}

impl CircuitBreaker {
    /// Creates a new breaker with the given configuration, starting closed.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            record: Mutex::new(BreakerRecord::new()),
            metrics: Mutex::new(BreakerMetrics::new()),
        }
    }

    /// Creates a new breaker with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }

    /// Returns the current state of the circuit.
    ///
    /// If the circuit is open and the reset timeout has elapsed, this
    /// transitions to half-open before returning; the transition is
    /// applied under the lock, so no subsequent reader observes the stale
    /// open state.
    pub fn current_state(&self) -> CircuitState {
        let mut record = self.lock_record();
        self.derive_state(&mut record);
        record.state
    }

    /// Returns `true` iff the circuit is open (after lazy derivation).
    pub fn is_blocking(&self) -> bool {
        self.current_state() == CircuitState::Open
    }

    /// Returns the consecutive-failure count.
    pub fn consecutive_failures(&self) -> u32 {
        self.lock_record().consecutive_failures
    }

    /// Returns when an open circuit becomes eligible for a probe, or
    /// `None` if the circuit has not opened.
    pub fn opened_until(&self) -> Option<Instant> {
        self.lock_record().opened_until
    }

    /// Returns a copy of the behavior counters.
    pub fn metrics(&self) -> BreakerMetrics {
        self.lock_metrics().clone()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Records a successful call.
    ///
    /// A single success fully heals the breaker: the failure count resets
    /// to 0 and the state is forced to closed, regardless of prior state.
    pub fn record_success(&self) {
        let mut record = self.lock_record();
        let was_closed = record.state.is_closed();

        record.consecutive_failures = 0;
        record.state = CircuitState::Closed;
        record.opened_until = None;

        let mut metrics = self.lock_metrics();
        metrics.record_success();
        if !was_closed {
            metrics.record_closed();
            tracing::debug!("circuit closed after successful call");
        }
    }

    /// Records a failed call.
    ///
    /// Increments the consecutive-failure count; on reaching the failure
    /// threshold from closed or half-open, the circuit opens and the reset
    /// timeout is armed. Failures recorded while the circuit is already
    /// open only bump the counter: the reset timeout is set by the opening
    /// transition alone.
    pub fn record_failure(&self) {
        let mut record = self.lock_record();
        record.consecutive_failures += 1;
        self.lock_metrics().record_failure();

        if record.state.is_open() {
            return;
        }

        if record.consecutive_failures >= self.config.failure_threshold {
            self.trip_open(&mut record);
        }
    }

    /// Executes a single half-open probe.
    ///
    /// No-op unless the circuit is half-open (after lazy derivation) and no
    /// other probe is in flight: while one probe runs, concurrent `probe`
    /// calls return immediately, so exactly one probe outcome decides
    /// recovery. `Ok(true)` heals the breaker; `Ok(false)` or an error
    /// counts as a failure and re-arms the reset timeout.
    ///
    /// This is the sole mechanism by which an open circuit transitions back
    /// toward closed; there is no automatic recovery.
    pub async fn probe<F, Fut>(&self, test_call: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, TransportError>>,
    {
        {
            let mut record = self.lock_record();
            self.derive_state(&mut record);
            if !record.state.is_half_open() || record.probe_in_flight {
                return;
            }
            record.probe_in_flight = true;
        }

        // Releases the admission token even if the probe future is dropped.
        let _admission = ProbeAdmission { breaker: self };

        match test_call().await {
            Ok(true) => {
                tracing::debug!("half-open probe succeeded");
                self.record_success();
            }
            Ok(false) => {
                tracing::debug!("half-open probe reported unhealthy");
                self.record_failure();
            }
            Err(err) => {
                tracing::debug!(error = %err, "half-open probe failed");
                self.record_failure();
            }
        }
    }

    /// Forces the circuit open, arming the reset timeout.
    pub fn force_open(&self) {
        let mut record = self.lock_record();
        if !record.state.is_open() {
            self.trip_open(&mut record);
        }
    }

    /// Resets the breaker to a fresh closed state, clearing metrics.
    pub fn reset(&self) {
        *self.lock_record() = BreakerRecord::new();
        *self.lock_metrics() = BreakerMetrics::new();
    }

    /// Notes a call rejected because the circuit was open.
    pub(crate) fn note_rejection(&self) {
        self.lock_metrics().record_rejected();
    }

    /// Applies the lazy `Open -> HalfOpen` transition if the reset timeout
    /// has elapsed. Must be called with the record lock held.
    fn derive_state(&self, record: &mut BreakerRecord) {
        if record.state.is_open() {
            let expired = record
                .opened_until
                .is_some_and(|until| Instant::now() >= until);
            if expired {
                record.state = CircuitState::HalfOpen;
                tracing::debug!("circuit half-open, ready to probe");
            }
        }
    }

    /// Transitions to open and arms the reset timeout. Must be called with
    /// the record lock held.
    fn trip_open(&self, record: &mut BreakerRecord) {
        record.state = CircuitState::Open;
        record.opened_until = Some(Instant::now() + self.config.reset_timeout);
        self.lock_metrics().record_opened();
        tracing::warn!(
            consecutive_failures = record.consecutive_failures,
            reset_timeout_ms = self.config.reset_timeout.as_millis() as u64,
            "circuit opened"
        );
    }

    fn lock_record(&self) -> std::sync::MutexGuard<'_, BreakerRecord> {
        self.record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_metrics(&self) -> std::sync::MutexGuard<'_, BreakerMetrics> {
        self.metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the probe-in-flight token when the probe completes or is dropped.
struct ProbeAdmission<'a> {
    breaker: &'a CircuitBreaker,
}

impl Drop for ProbeAdmission<'_> {
    fn drop(&mut self) {
        self.breaker.lock_record().probe_in_flight = false;
    }
}
