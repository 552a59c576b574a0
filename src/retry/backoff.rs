//! Exponential backoff policy.
//!
//! A pure, deterministic mapping from attempt index to wait duration.
//! No jitter and no cap are applied here; callers that want a ceiling
//! wrap the result with [`capped`].

use std::time::Duration;

/// Returns the delay before retry attempt `attempt` (0-based).
///
/// The delay doubles per attempt: `base * 2^attempt`. Saturates instead
/// of overflowing for very large attempt indices.
pub fn delay_for_attempt(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Clamps a backoff delay to a maximum.
pub fn capped(delay: Duration, max: Duration) -> Duration {
    delay.min(max)
}
