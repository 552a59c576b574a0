//! The resilient upstream client implementation.

use crate::cache::MemoryCache;
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::core::{
    ArcCache, ArcTransport, FetchError, Fetched, RequestSpec, ResponseCache, Transport,
    UpstreamResponse,
};
use crate::retry::{RequestExecutor, RetryConfig};

use std::sync::Arc;

/// Configuration for the resilient client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Circuit breaker configuration.
    pub breaker: CircuitBreakerConfig,

    /// Retry configuration.
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the circuit breaker configuration.
    pub fn with_breaker(mut self, breaker: CircuitBreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Builder for creating a [`ResilientClient`].
pub struct ResilientClientBuilder {
    transport: Option<ArcTransport>,
    cache: Option<ArcCache>,
    config: ClientConfig,
}

impl ResilientClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            transport: None,
            cache: None,
            config: ClientConfig::default(),
        }
    }

    /// Sets the transport.
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets the transport from a shared reference.
    pub fn with_arc_transport(mut self, transport: ArcTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the fallback cache. Defaults to an in-process
    /// [`MemoryCache`] when not supplied.
    pub fn with_cache<C: ResponseCache + 'static>(mut self, cache: C) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// Sets the fallback cache from a shared reference.
    pub fn with_arc_cache(mut self, cache: ArcCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the circuit breaker configuration.
    pub fn with_breaker_config(mut self, breaker: CircuitBreakerConfig) -> Self {
        self.config.breaker = breaker;
        self
    }

    /// Sets the retry configuration.
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] if no transport was supplied.
    pub fn build(self) -> Result<ResilientClient, FetchError> {
        let transport = self
            .transport
            .ok_or_else(|| FetchError::configuration("a transport is required"))?;
        let cache = self.cache.unwrap_or_else(|| Arc::new(MemoryCache::new()));
        let breaker = Arc::new(CircuitBreaker::new(self.config.breaker));
        let executor = RequestExecutor::new(transport.clone(), breaker.clone(), self.config.retry);

        Ok(ResilientClient {
            transport,
            cache,
            breaker,
            executor,
        })
    }
}

impl Default for ResilientClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A resilient client for one unreliable upstream.
///
/// Composes the circuit breaker, the retrying executor, and a fallback
/// cache: live calls that succeed refresh the cache, and calls that fail
/// terminally are answered from the last-known-good entry when one exists.
/// Each client owns exactly one breaker; the transport and cache are
/// shared collaborators.
///
/// # Example
///
/// ```rust
/// use legacybridge::client::ResilientClient;
/// use legacybridge::core::RequestSpec;
/// use legacybridge::transport::MockTransport;
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ResilientClient::builder()
///     .with_transport(MockTransport::new().with_default_data(json!({"name": "Alice"})))
///     .build()?;
///
/// let fetched = client.fetch("user:42", &RequestSpec::get("/users/42")).await?;
/// assert_eq!(fetched.data, json!({"name": "Alice"}));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ResilientClient {
    transport: ArcTransport,
    cache: ArcCache,
    breaker: Arc<CircuitBreaker>,
    executor: RequestExecutor,
}

impl ResilientClient {
    /// Creates a builder.
    pub fn builder() -> ResilientClientBuilder {
        ResilientClientBuilder::new()
    }

    /// Fetches a resource, falling back to the cache on failure.
    ///
    /// On a successful live call the payload is stored under `key`
    /// (overwriting any prior entry) and returned with
    /// [`Source::Live`](crate::core::Source). On a terminal failure the
    /// cache is consulted: a hit is returned with
    /// [`Source::Cache`](crate::core::Source) and the upstream failure is
    /// swallowed; a miss propagates the original error.
    pub async fn fetch(&self, key: &str, spec: &RequestSpec) -> Result<Fetched, FetchError> {
        match self.executor.execute(spec).await {
            Ok(response) => {
                self.cache.set(key, response.data.clone());
                Ok(Fetched::live(response.data))
            }
            Err(err) => match self.cache.get(key) {
                Some(data) => {
                    tracing::warn!(
                        upstream = self.transport.name(),
                        key,
                        error = %err,
                        "serving stale cached response after upstream failure"
                    );
                    Ok(Fetched::cached(data))
                }
                None => Err(err),
            },
        }
    }

    /// Performs one live call without touching the cache.
    ///
    /// Breaker gating and retries still apply; only the fallback path is
    /// skipped.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<UpstreamResponse, FetchError> {
        self.executor.execute(spec).await
    }

    /// Returns the circuit breaker guarding this client's upstream.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Returns the fallback cache.
    pub fn cache(&self) -> &ArcCache {
        &self.cache
    }

    /// Returns the name of the upstream.
    pub fn upstream_name(&self) -> &str {
        self.transport.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Source, TransportError};
    use crate::transport::MockTransport;
    use serde_json::json;
    use std::time::Duration;

    fn client_over(transport: Arc<MockTransport>) -> ResilientClient {
        ResilientClient::builder()
            .with_arc_transport(transport)
            .with_retry_config(RetryConfig::no_retry())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_live_fetch_stores_in_cache() {
        let transport = Arc::new(MockTransport::new().with_default_data(json!({"name": "Alice"})));
        let client = client_over(transport.clone());

        let fetched = client
            .fetch("user:42", &RequestSpec::get("/users/42"))
            .await
            .unwrap();

        assert_eq!(fetched.source, Source::Live);
        assert_eq!(fetched.data, json!({"name": "Alice"}));
        assert!(client.cache().has("user:42"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_open_circuit_served_from_cache() {
        let transport = Arc::new(MockTransport::new());
        let client = client_over(transport.clone());
        client.cache().set("user:42", json!({"name": "Alice"}));
        client.breaker().force_open();

        let fetched = client
            .fetch("user:42", &RequestSpec::get("/users/42"))
            .await
            .unwrap();

        assert_eq!(fetched.source, Source::Cache);
        assert_eq!(fetched.data, json!({"name": "Alice"}));
        // The transport itself is never touched while the circuit is open.
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_open_circuit_cache_miss_surfaces_error() {
        let transport = Arc::new(MockTransport::new());
        let client = client_over(transport.clone());
        client.breaker().force_open();

        let err = client
            .fetch("user:99", &RequestSpec::get("/users/99"))
            .await
            .unwrap_err();

        assert!(err.is_circuit_open());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_swallowed_by_cache_hit() {
        let transport = Arc::new(MockTransport::new());
        transport.push_failure(TransportError::http_status("/users/42", 404));
        let client = client_over(transport.clone());
        client.cache().set("user:42", json!({"name": "Alice"}));

        let fetched = client
            .fetch("user:42", &RequestSpec::get("/users/42"))
            .await
            .unwrap();

        assert!(fetched.is_from_cache());
    }

    #[tokio::test]
    async fn test_live_refresh_overwrites_stale_entry() {
        let transport = Arc::new(MockTransport::new().with_default_data(json!({"name": "Bob"})));
        let client = client_over(transport);
        client.cache().set("user:42", json!({"name": "Alice"}));

        let fetched = client
            .fetch("user:42", &RequestSpec::get("/users/42"))
            .await
            .unwrap();

        assert_eq!(fetched.source, Source::Live);
        assert_eq!(client.cache().get("user:42"), Some(json!({"name": "Bob"})));
    }

    #[tokio::test]
    async fn test_builder_requires_transport() {
        let err = ResilientClient::builder().build().unwrap_err();
        assert!(matches!(err, FetchError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_breaker_opens_after_repeated_fetch_failures() {
        let transport = Arc::new(MockTransport::new());
        let client = ResilientClient::builder()
            .with_arc_transport(transport.clone())
            .with_breaker_config(
                CircuitBreakerConfig::new()
                    .with_failure_threshold(2)
                    .with_reset_timeout(Duration::from_secs(10)),
            )
            .with_retry_config(RetryConfig::no_retry())
            .build()
            .unwrap();

        for _ in 0..2 {
            transport.push_failure(TransportError::http_status("/users/1", 500));
            let _ = client.fetch("user:1", &RequestSpec::get("/users/1")).await;
        }

        assert!(client.breaker().is_blocking());
    }
}
