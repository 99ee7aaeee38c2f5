//! HTTP transport layer.
//!
//! The proxy performs exactly one network call per operation through the
//! [`HttpRequester`] seam. The default implementation wraps a
//! [`reqwest::Client`]; tests substitute in-memory implementations.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::WireResponse;

// ============================================================================
// HttpRequester
// ============================================================================

/// Executes one HTTP call against a rewritten downstream URL.
///
/// Implementations perform exactly one network attempt: no retry, no
/// backoff. Request headers (content type, content length) are computed
/// here, not by callers. Non-2xx statuses are returned as ordinary
/// [`WireResponse`] values; only calls that cannot complete at all fail.
#[async_trait]
pub trait HttpRequester: Send + Sync {
    /// Performs the call and returns the raw response.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `method` is not a valid HTTP method
    /// - [`Error::Transport`] if the downstream server cannot be reached
    async fn request(&self, method: &str, url: &str, body: Option<&Value>)
    -> Result<WireResponse>;
}

// ============================================================================
// ReqwestRequester
// ============================================================================

/// Default [`HttpRequester`] backed by a [`reqwest::Client`].
///
/// The client is cheap to clone and connection reuse is handled inside
/// reqwest; this type holds no other state.
#[derive(Debug, Clone, Default)]
pub struct ReqwestRequester {
    client: reqwest::Client,
}

impl ReqwestRequester {
    /// Creates a requester with a default client.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a requester from an existing client.
    ///
    /// Use this to carry host-configured timeouts or TLS settings; a
    /// timeout enforced by the client surfaces as a transport error.
    #[inline]
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpRequester for ReqwestRequester {
    async fn request(
        &self,
        method: &str,
        url: &str,
        body: Option<&Value>,
    ) -> Result<WireResponse> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| Error::config(format!("Invalid HTTP method: {method}")))?;

        trace!(%method, url, has_body = body.is_some(), "forwarding request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| Error::transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| Error::transport(err.to_string()))?;

        debug!(status, url, "received downstream response");
        Ok(WireResponse::new(status, body))
    }
}

// ============================================================================
// Tests
// ============================================================================
