//! Circuit breaker state machine types.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// The current position of a circuit breaker.
///
/// ```text
/// Closed --(threshold consecutive failures)--> Open
/// Open   --(reset timeout elapses, observed lazily on read)--> HalfOpen
/// HalfOpen --(probe succeeds)--> Closed
/// HalfOpen --(probe fails)--> Open (re-arms the reset timeout)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Normal operation; calls pass through and failures are counted.
    Closed,
    /// The upstream is assumed down; calls are rejected immediately.
    Open,
    /// The reset timeout has elapsed; a single probe may test recovery.
    HalfOpen,
}

impl CircuitState {
    /// Returns `true` if the circuit is closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if the circuit is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` if the circuit is half-open.
    pub fn is_half_open(&self) -> bool {
        matches!(self, Self::HalfOpen)
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

impl Default for CircuitState {
    fn default() -> Self {
        Self::Closed
    }
}

/// The mutable record owned by one breaker instance.
///
/// All fields are read and written under a single lock; the lazy
/// `Open -> HalfOpen` transition and the threshold check in
/// `record_failure` are each one critical section, never a read-modify-
/// write split across two lock acquisitions.
#[derive(Debug)]
pub(crate) struct BreakerRecord {
    /// Consecutive failures observed since the last success.
    pub consecutive_failures: u32,
    /// Current state of the circuit.
    pub state: CircuitState,
    /// When an open circuit becomes eligible for a half-open probe.
    /// Set exactly once per `Closed/HalfOpen -> Open` transition.
    pub opened_until: Option<Instant>,
    /// Single-admission token: `true` while a half-open probe is in
    /// flight, so at most one probe outcome decides recovery.
    pub probe_in_flight: bool,
}

impl BreakerRecord {
    /// Creates a fresh record in the closed state.
    pub fn new() -> Self {
        Self {
            consecutive_failures: 0,
            state: CircuitState::Closed,
            opened_until: None,
            probe_in_flight: false,
        }
    }
}

/// In-process counters describing breaker behavior.
///
/// These are introspection data for operators and tests, not an emission
/// layer; exporting them is the caller's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakerMetrics {
    /// Total number of outcomes reported to the breaker.
    pub total_calls: u64,
    /// Number of successes reported.
    pub successes: u64,
    /// Number of failures reported.
    pub failures: u64,
    /// Number of calls rejected because the circuit was open.
    pub rejected: u64,
    /// Number of times the circuit has opened.
    pub times_opened: u64,
    /// Number of times the circuit has closed again.
    pub times_closed: u64,
}

impl BreakerMetrics {
    /// Creates new empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reported success.
    pub(crate) fn record_success(&mut self) {
        self.total_calls += 1;
        self.successes += 1;
    }

    /// Records a reported failure.
    pub(crate) fn record_failure(&mut self) {
        self.total_calls += 1;
        self.failures += 1;
    }

    /// Records a call rejected by an open circuit.
    pub(crate) fn record_rejected(&mut self) {
        self.total_calls += 1;
        self.rejected += 1;
    }

    /// Records that the circuit opened.
    pub(crate) fn record_opened(&mut self) {
        self.times_opened += 1;
    }

    /// Records that the circuit closed.
    pub(crate) fn record_closed(&mut self) {
        self.times_closed += 1;
    }

    /// Returns the success rate (0.0 to 1.0).
    pub fn success_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 1.0;
        }
        self.successes as f64 / self.total_calls as f64
    }

    /// Returns the failure rate (0.0 to 1.0).
    pub fn failure_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 0.0;
        }
        self.failures as f64 / self.total_calls as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_default() {
        assert!(CircuitState::default().is_closed());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(CircuitState::Closed.name(), "closed");
        assert_eq!(CircuitState::Open.name(), "open");
        assert_eq!(CircuitState::HalfOpen.name(), "half_open");
    }

    #[test]
    fn test_fresh_record() {
        let record = BreakerRecord::new();
        assert_eq!(record.consecutive_failures, 0);
        assert!(record.state.is_closed());
        assert!(record.opened_until.is_none());
        assert!(!record.probe_in_flight);
    }

    #[test]
    fn test_metrics() {
        let mut metrics = BreakerMetrics::new();
        assert_eq!(metrics.success_rate(), 1.0);
        assert_eq!(metrics.failure_rate(), 0.0);

        metrics.record_success();
        metrics.record_success();
        metrics.record_failure();

        assert_eq!(metrics.total_calls, 3);
        assert_eq!(metrics.successes, 2);
        assert_eq!(metrics.failures, 1);
        assert!((metrics.success_rate() - 0.666).abs() < 0.01);
    }
}
