//! Boundary traits for HTTP request/response passthrough.
//!
//! [`Proxy::proxy_req_res`](crate::Proxy::proxy_req_res) consumes an inbound
//! request and writes the downstream answer to an outbound sink. Both sides
//! are supplied by the host HTTP server framework; the proxy only needs read
//! access to method/path/body and write access to status/headers/body.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

// ============================================================================
// ProxiedRequest
// ============================================================================

/// Read access to an inbound HTTP request.
pub trait ProxiedRequest {
    /// HTTP method name, e.g. `GET`.
    fn method(&self) -> &str;

    /// Request path as received, including any base path and query string.
    fn path(&self) -> &str;

    /// Decoded JSON request body, if any.
    fn body(&self) -> Option<&Value>;
}

// ============================================================================
// ResponseSink
// ============================================================================

/// Write access to an outbound HTTP response.
pub trait ResponseSink {
    /// Sets a response header.
    fn set_header(&mut self, name: &str, value: &str);

    /// Writes the status code and JSON body.
    fn send(&mut self, status: u16, body: &Value);
}

// ============================================================================
// RequestParts
// ============================================================================

/// Plain owned implementation of [`ProxiedRequest`].
///
/// Convenient for hosts that have already pulled the request apart.
#[derive(Debug, Clone)]
pub struct RequestParts {
    method: String,
    path: String,
    body: Option<Value>,
}

impl RequestParts {
    /// Creates request parts from method, path, and optional body.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body,
        }
    }
}

impl ProxiedRequest for RequestParts {
    #[inline]
    fn method(&self) -> &str {
        &self.method
    }

    #[inline]
    fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_request_parts() {
        let parts = RequestParts::new("POST", "/session", Some(json!({"capabilities": {}})));
        assert_eq!(parts.method(), "POST");
        assert_eq!(parts.path(), "/session");
        assert_eq!(parts.body(), Some(&json!({"capabilities": {}})));

        let parts = RequestParts::new("GET", "/status", None);
        assert_eq!(parts.body(), None);
    }
}
