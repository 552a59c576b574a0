//! Boundary translation for HTTP gateways.
//!
//! The web-routing layer that receives inbound requests stays outside this
//! crate; this module only translates client outcomes into HTTP responses,
//! plus a ready-made axum [`Router`] for the common case of exposing one
//! wrapped resource.
//!
//! ## Contract
//!
//! - Success: `200` with JSON `{"data": ..., "source": "live"|"cache"}`
//!   and an `X-Cache: MISS|HIT` header.
//! - Circuit open with no cached fallback: `503` with
//!   `{"error": "UpstreamUnavailable", "details": ...}`.
//! - Other terminal failures: the upstream's status when known, else `502`,
//!   with the same error body.

use crate::cache::cache_key;
use crate::client::ResilientClient;
use crate::core::{FetchError, Fetched, RequestSpec, Source};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header::HeaderName, Response, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Header carrying the cache hit/miss indicator.
pub static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// JSON body returned for terminal failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable error tag.
    pub error: &'static str,
    /// Human-readable failure description.
    pub details: String,
}

impl ErrorBody {
    /// Builds the error body for a terminal fetch failure.
    pub fn from_error(err: &FetchError) -> Self {
        Self {
            error: "UpstreamUnavailable",
            details: err.to_string(),
        }
    }
}

/// Maps a terminal fetch failure to a response status.
///
/// `503` when the circuit blocked the call, the upstream's own status when
/// the failure carries one, `502` otherwise.
pub fn status_for_error(err: &FetchError) -> StatusCode {
    if err.is_circuit_open() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    err.status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Renders a completed fetch as an HTTP response.
///
/// The `X-Cache` header reports `MISS` for live serves and `HIT` for
/// cache fallbacks.
pub fn fetched_response(fetched: &Fetched) -> Response<Body> {
    let indicator = match fetched.source {
        Source::Live => "MISS",
        Source::Cache => "HIT",
    };
    ([(X_CACHE.clone(), indicator)], Json(fetched)).into_response()
}

/// Renders a terminal fetch failure as an HTTP response.
pub fn error_response(err: &FetchError) -> Response<Body> {
    (status_for_error(err), Json(ErrorBody::from_error(err))).into_response()
}

#[derive(Clone)]
struct GatewayState {
    client: Arc<ResilientClient>,
    resource: String,
}

/// Builds a router exposing one wrapped resource.
///
/// Routes `GET /api/{resource}/{id}` through the client (cache key
/// `{resource}:{id}`, upstream path `/{resource}/{id}`) and serves a
/// liveness endpoint at `/health`.
///
/// # Example
///
/// ```rust,ignore
/// use legacybridge::gateway::resource_router;
///
/// let app = resource_router(client, "users");
/// axum::serve(listener, app).await?;
/// ```
pub fn resource_router(client: Arc<ResilientClient>, resource: impl Into<String>) -> Router {
    let resource = resource.into();
    let path = format!("/api/{resource}/{{id}}");
    let state = GatewayState { client, resource };

    Router::new()
        .route("/health", get(health))
        .route(&path, get(fetch_resource))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn fetch_resource(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response<Body> {
    let key = cache_key([state.resource.as_str(), id.as_str()]);
    let spec = RequestSpec::get(format!("/{}/{}", state.resource, id));

    match state.client.fetch(&key, &spec).await {
        Ok(fetched) => fetched_response(&fetched),
        Err(err) => {
            tracing::warn!(
                upstream = state.client.upstream_name(),
                key = %key,
                error = %err,
                "terminal upstream failure surfaced to gateway"
            );
            error_response(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransportError;
    use crate::retry::RetryConfig;
    use crate::transport::MockTransport;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_over(transport: Arc<MockTransport>) -> (Arc<ResilientClient>, Router) {
        let client = Arc::new(
            ResilientClient::builder()
                .with_arc_transport(transport)
                .with_retry_config(RetryConfig::no_retry())
                .build()
                .unwrap(),
        );
        (client.clone(), resource_router(client, "users"))
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let open = FetchError::CircuitOpen {
            upstream: "legacy".into(),
            recovery_hint: None,
        };
        assert_eq!(status_for_error(&open), StatusCode::SERVICE_UNAVAILABLE);

        let not_found = FetchError::Permanent {
            source: TransportError::http_status("/users/1", 404),
        };
        assert_eq!(status_for_error(&not_found), StatusCode::NOT_FOUND);

        let timeout = FetchError::Transient {
            attempts: 3,
            source: TransportError::timeout("/users/1", std::time::Duration::from_secs(5)),
        };
        assert_eq!(status_for_error(&timeout), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_live_serve_sets_miss_header() {
        let transport = Arc::new(MockTransport::new().with_default_data(json!({"name": "Alice"})));
        let (_client, app) = app_over(transport);

        let response = app
            .oneshot(Request::get("/api/users/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(&X_CACHE).unwrap(), "MISS");
        assert_eq!(
            body_json(response).await,
            json!({"data": {"name": "Alice"}, "source": "live"})
        );
    }

    #[tokio::test]
    async fn test_cache_serve_sets_hit_header() {
        let transport = Arc::new(MockTransport::new());
        let (client, app) = app_over(transport);
        client.cache().set("users:42", json!({"name": "Alice"}));
        client.breaker().force_open();

        let response = app
            .oneshot(Request::get("/api/users/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(&X_CACHE).unwrap(), "HIT");
        assert_eq!(
            body_json(response).await,
            json!({"data": {"name": "Alice"}, "source": "cache"})
        );
    }

    #[tokio::test]
    async fn test_open_circuit_without_fallback_is_503() {
        let transport = Arc::new(MockTransport::new());
        let (client, app) = app_over(transport);
        client.breaker().force_open();

        let response = app
            .oneshot(Request::get("/api/users/99").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"], "UpstreamUnavailable");
    }

    #[tokio::test]
    async fn test_upstream_status_passes_through() {
        let transport = Arc::new(MockTransport::new());
        transport.push_failure(TransportError::http_status("/users/1", 404));
        let (_client, app) = app_over(transport);

        let response = app
            .oneshot(Request::get("/api/users/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let transport = Arc::new(MockTransport::new());
        let (_client, app) = app_over(transport);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }
}
