//! Upstream response and fetch result types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A successful response from the upstream.
///
/// Transports only produce this for success statuses; non-success statuses
/// are mapped to [`TransportError::HttpStatus`](crate::core::TransportError)
/// so the retry layer can classify them.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status of the response (always a success status).
    pub status: u16,
    /// Decoded JSON payload.
    pub data: Value,
}

impl UpstreamResponse {
    /// Creates a response with the given status and payload.
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// Creates a `200 OK` response with the given payload.
    pub fn ok(data: Value) -> Self {
        Self::new(200, data)
    }
}

/// Where the data of a completed fetch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from a live upstream call.
    Live,
    /// Served from the fallback cache after a failed upstream call.
    Cache,
}

impl Source {
    /// Returns the source name as used in response envelopes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Cache => "cache",
        }
    }
}

/// The result of a completed fetch: the payload plus its provenance.
///
/// A `source` of [`Source::Cache`] means the live call failed and a
/// previously-seen response was served instead; the caller sees a success
/// either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fetched {
    /// The response payload.
    pub data: Value,
    /// Whether the payload came from the live upstream or the cache.
    pub source: Source,
}

impl Fetched {
    /// Creates a fetch result served from a live upstream call.
    pub fn live(data: Value) -> Self {
        Self {
            data,
            source: Source::Live,
        }
    }

    /// Creates a fetch result served from the fallback cache.
    pub fn cached(data: Value) -> Self {
        Self {
            data,
            source: Source::Cache,
        }
    }

    /// Returns `true` if the payload was served from the cache.
    pub fn is_from_cache(&self) -> bool {
        self.source == Source::Cache
    }
}
