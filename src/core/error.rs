//! Error types for the legacybridge library.
//!
//! This module provides structured, typed errors for all failure scenarios.
//! The library never panics; all errors are returned as `Result` values.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by a [`Transport`](crate::core::Transport) for a single
/// upstream call.
///
/// The three variants cover the failure modes the retry layer needs to
/// distinguish: timeouts and aborted connections are always transient,
/// HTTP statuses are transient only when server-side (>= 500).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call did not complete within the transport's deadline.
    #[error("call to '{endpoint}' timed out after {elapsed:?}")]
    Timeout {
        /// Endpoint that was being called.
        endpoint: String,
        /// How long the call ran before the deadline fired.
        elapsed: Duration,
    },

    /// The connection was refused, reset, or dropped mid-flight.
    #[error("connection to '{endpoint}' aborted: {message}")]
    ConnectionAborted {
        /// Endpoint that was being called.
        endpoint: String,
        /// Description of the connection failure.
        message: String,
    },

    /// The upstream answered with a non-success HTTP status.
    #[error("upstream returned HTTP {status} for '{endpoint}'")]
    HttpStatus {
        /// Endpoint that was being called.
        endpoint: String,
        /// The HTTP status code returned.
        status: u16,
    },
}

impl TransportError {
    /// Creates a timeout error.
    pub fn timeout(endpoint: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            endpoint: endpoint.into(),
            elapsed,
        }
    }

    /// Creates a connection-aborted error.
    pub fn aborted(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionAborted {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Returns `true` if this failure is worth retrying.
    ///
    /// Timeouts and aborted connections are always transient; HTTP statuses
    /// are transient only when server-side (>= 500). Client errors (4xx)
    /// are permanent and must not be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionAborted { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500,
        }
    }

    /// Returns the HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the endpoint this error is associated with.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Timeout { endpoint, .. }
            | Self::ConnectionAborted { endpoint, .. }
            | Self::HttpStatus { endpoint, .. } => endpoint,
        }
    }
}

/// The main error type surfaced by the resilient client.
///
/// Every terminal failure either resolves to a cached success inside
/// [`ResilientClient::fetch`](crate::client::ResilientClient::fetch) or is
/// returned as one of these variants, with enough information (kind plus
/// original status, if any) for a boundary layer to pick a response code.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The circuit breaker blocked the call before it was issued.
    #[error("circuit breaker open for upstream '{upstream}'")]
    CircuitOpen {
        /// Name of the upstream with the open circuit.
        upstream: String,
        /// When the circuit might allow a probe (if known).
        recovery_hint: Option<String>,
    },

    /// A retryable failure that survived every attempt.
    #[error("upstream call failed after {attempts} attempt(s): {source}")]
    Transient {
        /// Total attempts made, including the first.
        attempts: u32,
        /// The last transport error observed.
        #[source]
        source: TransportError,
    },

    /// A non-retryable failure, surfaced without consuming a retry.
    #[error("upstream rejected the call: {source}")]
    Permanent {
        /// The transport error observed.
        #[source]
        source: TransportError,
    },

    /// The client was constructed with invalid or missing configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl FetchError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if the circuit breaker blocked this call.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }

    /// Returns the upstream HTTP status, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transient { source, .. } | Self::Permanent { source } => source.status(),
            _ => None,
        }
    }

    /// Returns the underlying transport error, if any.
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Transient { source, .. } | Self::Permanent { source } => Some(source),
            _ => None,
        }
    }
}
