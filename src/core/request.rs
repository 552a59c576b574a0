//! Upstream request description.
//!
//! A [`RequestSpec`] captures one logical call against the legacy upstream:
//! the method, the path relative to the upstream's base URL, and an
//! optional JSON body. Transports turn it into a wire request.

use serde_json::Value;

/// HTTP method of an upstream call.
///
/// Only the methods the legacy upstream actually serves are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// A read call.
    Get,
    /// A write call with a JSON body.
    Post,
}

impl RequestMethod {
    /// Returns the method name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One logical call against the upstream.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: RequestMethod,
    /// Path relative to the upstream's base URL, e.g. `/users/42`.
    pub path: String,
    /// Optional JSON body (POST only).
    pub body: Option<Value>,
}

impl RequestSpec {
    /// Creates a GET request for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    /// Creates a POST request for the given path with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: RequestMethod::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_spec() {
        let spec = RequestSpec::get("/users/42");
        assert_eq!(spec.method, RequestMethod::Get);
        assert_eq!(spec.path, "/users/42");
        assert!(spec.body.is_none());
    }

    #[test]
    fn test_post_spec() {
        let spec = RequestSpec::post("/users", json!({"name": "Alice"}));
        assert_eq!(spec.method, RequestMethod::Post);
        assert_eq!(spec.body, Some(json!({"name": "Alice"})));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(RequestMethod::Get.as_str(), "GET");
        assert_eq!(RequestMethod::Post.as_str(), "POST");
    }
}
