//! Core traits for the legacybridge library.
//!
//! This module defines the `Transport` trait that wire-level backends must
//! implement, and the `ResponseCache` trait consumed by the fallback path.
//! Both are abstract collaborators: the resilience core never depends on a
//! concrete HTTP client or cache implementation.

use crate::core::error::TransportError;
use crate::core::request::RequestSpec;
use crate::core::response::UpstreamResponse;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// The wire-level interface to the legacy upstream.
///
/// All transport backends (the built-in HTTP transport, test mocks, etc.)
/// implement this trait, providing a consistent interface for issuing one
/// upstream call.
///
/// # Implementation Notes
///
/// - Implementations must be `Send + Sync` for use in async contexts.
/// - Every call must be bounded by a best-effort timeout; a call that
///   exceeds it returns [`TransportError::Timeout`].
/// - Non-success HTTP statuses must be mapped to
///   [`TransportError::HttpStatus`] rather than returned as responses, so
///   the retry layer can classify them as transient (>= 500) or permanent.
/// - `health_check` should be cheap (e.g. a `/health` GET) and must not
///   share fate with expensive endpoints; it is the half-open probe.
/// - Implementations should never panic; all failures are `TransportError`s.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use legacybridge::core::{Transport, RequestSpec, UpstreamResponse, TransportError};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyTransport {
///     name: String,
/// }
///
/// #[async_trait]
/// impl Transport for MyTransport {
///     fn name(&self) -> &str {
///         &self.name
///     }
///
///     async fn call(&self, spec: &RequestSpec) -> Result<UpstreamResponse, TransportError> {
///         // Issue the wire request...
///         todo!()
///     }
///
///     async fn health_check(&self) -> Result<(), TransportError> {
///         // Hit a cheap endpoint...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Returns the name of this upstream.
    ///
    /// This should be a stable, human-readable identifier like "legacy";
    /// it appears in errors and log events.
    fn name(&self) -> &str;

    /// Issues one call against the upstream.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Timeout`] - the call exceeded the deadline.
    /// - [`TransportError::ConnectionAborted`] - the connection failed.
    /// - [`TransportError::HttpStatus`] - the upstream answered with a
    ///   non-success status.
    async fn call(&self, spec: &RequestSpec) -> Result<UpstreamResponse, TransportError>;

    /// Performs a cheap health check against the upstream.
    ///
    /// Used as the half-open probe while the circuit is open. Must not
    /// require a payload and should complete quickly.
    async fn health_check(&self) -> Result<(), TransportError>;
}

/// A shared, reference-counted transport.
pub type ArcTransport = Arc<dyn Transport>;

/// Last-known-good response storage consumed by the fallback path.
///
/// The cache is assumed synchronous and never-failing: absence of a key is
/// a miss, not an error. No freshness contract is imposed here; eviction
/// and staleness tolerance are the implementation's policy.
pub trait ResponseCache: Send + Sync + Debug {
    /// Returns `true` if the cache holds an entry for `key`.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the entry stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, overwriting any prior entry.
    fn set(&self, key: &str, value: Value);
}

/// A shared, reference-counted response cache.
pub type ArcCache = Arc<dyn ResponseCache>;
