//! The resilient upstream client.
//!
//! Composes the circuit breaker, retrying executor, and fallback cache
//! into a single client for one unreliable upstream:
//!
//! ```text
//! fetch(key, spec)
//!     -> executor (breaker gate, retries with backoff)
//!         -> transport call
//!     -> on success: refresh cache, serve live
//!     -> on terminal failure: serve cached entry if present,
//!        else surface the error
//! ```

mod resilient_client;

pub use resilient_client::{ClientConfig, ResilientClient, ResilientClientBuilder};
