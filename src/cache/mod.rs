//! Fallback cache implementations and key helpers.
//!
//! The resilience core only consumes the
//! [`ResponseCache`](crate::core::ResponseCache) contract; this module
//! provides the default in-memory implementation and a helper for
//! building namespaced cache keys.

mod memory;

pub use memory::MemoryCache;

/// Builds a cache key from path-like segments, e.g.
/// `cache_key(["user", "42"])` -> `"user:42"`.
pub fn cache_key<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_joins_segments() {
        assert_eq!(cache_key(["user", "42"]), "user:42");
        assert_eq!(cache_key(vec!["a".to_string(), "b".to_string()]), "a:b");
    }

    #[test]
    fn test_cache_key_single_segment() {
        assert_eq!(cache_key(["health"]), "health");
    }
}
