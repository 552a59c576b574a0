//! Circuit breaker for upstream protection.
//!
//! The circuit breaker pattern prevents cascading failures by failing fast
//! while the upstream is deemed unhealthy and periodically probing it to
//! detect recovery.
//!
//! ## States
//!
//! - **Closed**: Normal operation; calls pass through.
//! - **Open**: The upstream is failing; calls are rejected immediately.
//! - **Half-Open**: Probing the upstream to see if it has recovered.
//!
//! ## Usage
//!
//! ```rust
//! use legacybridge::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
//! use std::time::Duration;
//!
//! let breaker = CircuitBreaker::new(
//!     CircuitBreakerConfig::default()
//!         .with_failure_threshold(5)
//!         .with_reset_timeout(Duration::from_secs(10)),
//! );
//! ```

mod breaker;
mod config;
mod state;

pub use breaker::CircuitBreaker;
pub use config::CircuitBreakerConfig;
pub use state::{BreakerMetrics, CircuitState};
