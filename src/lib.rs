//! # Legacybridge
//!
//! A resilience layer placed in front of an unreliable legacy HTTP
//! upstream, combining circuit breaking, bounded retries with exponential
//! backoff, and stale-cache fallback.
//!
//! ## Overview
//!
//! Legacybridge protects callers from cascading failure when the upstream
//! is slow or erroring, and preserves partial availability by serving
//! previously-seen data when the upstream cannot be reached:
//!
//! - Fail fast while the upstream is unhealthy (circuit breaker)
//! - Retry transient failures with exponential backoff
//! - Serve the last-known-good response when a live call cannot complete
//! - Plug in any wire mechanism or cache via the `Transport` and
//!   `ResponseCache` traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use legacybridge::client::ResilientClient;
//! use legacybridge::core::RequestSpec;
//! use legacybridge::transport::{HttpTransport, HttpTransportConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new(
//!         HttpTransportConfig::new("http://legacy.internal:8080"),
//!     )?;
//!
//!     let client = ResilientClient::builder()
//!         .with_transport(transport)
//!         .build()?;
//!
//!     let fetched = client.fetch("user:42", &RequestSpec::get("/users/42")).await?;
//!     println!("{} (from {})", fetched.data, fetched.source.as_str());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `default` - Includes the `reqwest`-backed HTTP transport
//! - `http-transport` - HTTP transport support
//! - `gateway` - axum boundary helpers (status mapping, envelopes, router)
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Core**: Collaborator traits, request/response types, and errors
//! - **Circuit Breaker**: Health tracking with fail-fast gating
//! - **Retry**: Backoff policy and the retrying request executor
//! - **Cache**: Fallback storage for last-known-good responses
//! - **Transport**: Wire-level backends (HTTP, mock)
//! - **Client**: The composed resilient upstream client
//! - **Gateway**: Optional HTTP boundary translation

pub mod cache;
pub mod circuit_breaker;
pub mod client;
pub mod core;
pub mod retry;
pub mod transport;

#[cfg(feature = "gateway")]
pub mod gateway;

pub use cache::{cache_key, MemoryCache};
pub use circuit_breaker::{BreakerMetrics, CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use client::{ClientConfig, ResilientClient, ResilientClientBuilder};
pub use crate::core::{
    ArcCache, ArcTransport, FetchError, Fetched, RequestMethod, RequestSpec, ResponseCache,
    Source, Transport, TransportError, UpstreamResponse,
};
pub use retry::{RequestExecutor, RetryConfig};
pub use transport::MockTransport;

#[cfg(feature = "http-transport")]
pub use transport::{HttpTransport, HttpTransportConfig};
