//! Retrying execution with exponential backoff.
//!
//! The executor issues one logical call, consults the circuit breaker
//! before attempting, retries transient failures per the backoff policy,
//! and reports the terminal outcome back to the breaker.

mod backoff;
mod executor;

pub use backoff::{capped, delay_for_attempt};
pub use executor::{RequestExecutor, RetryConfig};
