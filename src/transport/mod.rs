//! Transport implementations.
//!
//! This module contains implementations of the `Transport` trait, the
//! wire-level interface to the legacy upstream.
//!
//! ## Available Transports
//!
//! - [`mock`] - A scriptable mock for testing
//! - [`http`] - A `reqwest`-backed HTTP transport (requires the
//!   `http-transport` feature, enabled by default)
//!
//! ## Implementing a Custom Transport
//!
//! To talk to an upstream over some other mechanism, implement the
//! `Transport` trait:
//!
//! ```rust,ignore
//! use legacybridge::core::{Transport, RequestSpec, UpstreamResponse, TransportError};
//! use async_trait::async_trait;
//!
//! #[derive(Debug)]
//! pub struct MyTransport {
//!     // Your transport's configuration
//! }
//!
//! #[async_trait]
//! impl Transport for MyTransport {
//!     fn name(&self) -> &str {
//!         "my-upstream"
//!     }
//!
//!     async fn call(&self, spec: &RequestSpec) -> Result<UpstreamResponse, TransportError> {
//!         // Issue the call
//!         todo!()
//!     }
//!
//!     async fn health_check(&self) -> Result<(), TransportError> {
//!         // Hit a cheap endpoint
//!         Ok(())
//!     }
//! }
//! ```

pub mod mock;

#[cfg(feature = "http-transport")]
pub mod http;

// Re-exports
pub use mock::MockTransport;

#[cfg(feature = "http-transport")]
pub use http::{HttpTransport, HttpTransportConfig};
