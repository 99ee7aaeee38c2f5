//! Core Proxy struct and the three public operations.
//!
//! A [`Proxy`] owns its downstream configuration and the identity of "this
//! proxy's current remote session". Each operation is one sequential unit
//! of work with exactly one outbound call:
//!
//! - [`Proxy::proxy`] — raw forward; returns the response and decoded body
//!   without classifying failures.
//! - [`Proxy::command`] — interpreted command; returns the success value or
//!   raises the classified remote error.
//! - [`Proxy::proxy_req_res`] — HTTP passthrough; mirrors the downstream
//!   response to a sink, rewriting the visible session id.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::Result;
use crate::protocol::{WireResponse, interpret};
use crate::transport::HttpRequester;

use super::builder::{ProxyBuilder, ProxyConfig};
use super::passthrough::{ProxiedRequest, ResponseSink};
use super::rewrite::{rewrite_url, session_id_from_path};

// ============================================================================
// Proxy
// ============================================================================

/// Session-aware reverse proxy to one WebDriver-compatible server.
///
/// The only mutable state is the current session id, written once on the
/// session-creation path; the mutex makes that write atomic with respect
/// to the next call's URL rewrite. Ordering between a session creation and
/// a subsequent command is the caller's concern.
pub struct Proxy {
    config: ProxyConfig,
    session_id: Mutex<Option<String>>,
    requester: Box<dyn HttpRequester>,
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("config", &self.config)
            .field("session_id", &*self.session_id.lock())
            .finish_non_exhaustive()
    }
}

impl Proxy {
    /// Returns a builder for configuring a proxy.
    #[inline]
    #[must_use]
    pub fn builder() -> ProxyBuilder {
        ProxyBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ProxyConfig,
        session_id: Option<String>,
        requester: Box<dyn HttpRequester>,
    ) -> Self {
        Self {
            config,
            session_id: Mutex::new(session_id),
            requester,
        }
    }
}

// ============================================================================
// Proxy - Accessors
// ============================================================================

impl Proxy {
    /// Returns the downstream server host.
    #[inline]
    #[must_use]
    pub fn server(&self) -> &str {
        &self.config.server
    }

    /// Returns the downstream server port.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Returns the URL scheme.
    #[inline]
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.config.scheme
    }

    /// Returns the configured inbound base path.
    #[inline]
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.config.base_path
    }

    /// Returns the current session id, if one is set.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().clone()
    }
}

// ============================================================================
// Proxy - URL Rewriting
// ============================================================================

impl Proxy {
    /// Rewrites an inbound path into the absolute downstream URL.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) if the path requires a
    ///   session id and none is set, or a configured base path mismatches
    pub fn endpoint_url(&self, path: &str, method: &str) -> Result<String> {
        rewrite_url(
            &self.config,
            self.session_id.lock().as_deref(),
            path,
            method,
        )
    }
}

// ============================================================================
// Proxy - Operations
// ============================================================================

impl Proxy {
    /// Forwards one request and returns the raw response with its decoded
    /// body.
    ///
    /// Classification failures are not raised here; only transport and
    /// configuration errors propagate. On a successful session-creation
    /// response the new session id is stored, unless one is already set.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) from URL rewriting
    /// - [`Error::Transport`](crate::Error::Transport) if the downstream
    ///   server cannot be reached
    pub async fn proxy(
        &self,
        path: &str,
        method: &str,
        body: Option<&Value>,
    ) -> Result<(WireResponse, Value)> {
        let url = self.endpoint_url(path, method)?;
        trace!(%url, method, "proxying request");

        let response = self.requester.request(method, &url, body).await?;
        let decoded = response.decode_body();

        self.capture_session_id(&url, method, &response, &decoded);
        Ok((response, decoded))
    }

    /// Forwards one request and interprets the response.
    ///
    /// # Errors
    ///
    /// Everything [`Proxy::proxy`] raises, plus
    /// [`Error::Remote`](crate::Error::Remote) when the response classifies
    /// as a failure in either wire dialect.
    pub async fn command(&self, path: &str, method: &str, body: Option<&Value>) -> Result<Value> {
        let (response, decoded) = self.proxy(path, method, body).await?;
        interpret(response.status, decoded).into_result()
    }

    /// Forwards an inbound HTTP request and mirrors the downstream response
    /// to the sink.
    ///
    /// The downstream status code is written verbatim, with a JSON content
    /// type. A `sessionId` field in the response body is rewritten so the
    /// externally visible identifier stays stable: to the id named by the
    /// inbound URL when there is one, else to the proxy's current id.
    /// Classified remote errors are never raised here.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) from URL rewriting
    /// - [`Error::Transport`](crate::Error::Transport) if the downstream
    ///   server cannot be reached
    pub async fn proxy_req_res<R, S>(&self, req: &R, sink: &mut S) -> Result<()>
    where
        R: ProxiedRequest,
        S: ResponseSink,
    {
        let (response, mut body) = self.proxy(req.path(), req.method(), req.body()).await?;

        if let Some(object) = body.as_object_mut()
            && object.contains_key("sessionId")
        {
            let visible_id =
                session_id_from_path(&self.config, req.path()).or_else(|| self.session_id());
            if let Some(visible_id) = visible_id {
                object.insert("sessionId".to_string(), Value::String(visible_id));
            }
        }

        sink.set_header("content-type", "application/json; charset=utf-8");
        sink.send(response.status, &body);
        Ok(())
    }
}

// ============================================================================
// Proxy - Session Bookkeeping
// ============================================================================

impl Proxy {
    /// Stores the session id from a successful session-creation response.
    ///
    /// Applies only to a 2xx `POST` whose rewritten path is the root
    /// session-creation endpoint, and only while no session id is set; a
    /// seeded or previously captured id is never replaced.
    fn capture_session_id(
        &self,
        outbound_url: &str,
        method: &str,
        response: &WireResponse,
        body: &Value,
    ) {
        if !method.eq_ignore_ascii_case("POST") || !response.is_success() {
            return;
        }
        let outbound_path = outbound_url.split('?').next().unwrap_or_default();
        if !outbound_path.ends_with("/session") {
            return;
        }

        // The legacy dialect reports the new id at the top level, the
        // structured dialect inside the value member.
        let new_id = body
            .get("sessionId")
            .and_then(Value::as_str)
            .or_else(|| {
                body.get("value")
                    .and_then(|value| value.get("sessionId"))
                    .and_then(Value::as_str)
            });

        if let Some(new_id) = new_id {
            let mut session_id = self.session_id.lock();
            if session_id.is_none() {
                debug!(session_id = new_id, "captured session id from creation response");
                *session_id = Some(new_id.to_string());
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::error::Error;
    use crate::protocol::ErrorKind;
    use crate::proxy::passthrough::RequestParts;

    // ------------------------------------------------------------------------
    // Mock transport
    // ------------------------------------------------------------------------

    /// In-memory requester with a fixed route table.
    struct MockRequester;

    #[async_trait]
    impl HttpRequester for MockRequester {
        async fn request(
            &self,
            method: &str,
            url: &str,
            _body: Option<&Value>,
        ) -> Result<WireResponse> {
            let route = (method, url);
            let (status, body) = match route {
                ("GET", "http://h:4444/status") => {
                    (200, json!({"status": 0, "value": {"foo": "bar"}}))
                }
                ("POST", "http://h:4444/session") => (
                    200,
                    json!({"status": 0, "sessionId": "123", "value": {"browserName": "boo"}}),
                ),
                ("GET", "http://h:4444/session/123/element/bad/text") => {
                    (500, json!({"status": 11, "value": {"message": "Invisible element"}}))
                }
                ("GET", "http://h:4444/session/123/element/200/text") => (
                    200,
                    json!({"value": {"error": "element not visible", "message": "Invisible element"}}),
                ),
                ("GET", "http://h:4444/session/123/element/200/value") => {
                    (200, json!({"value": "foobar", "sessionId": "native-999"}))
                }
                ("GET", "http://h:4444/session/123/nochrome") => {
                    (100, json!({"value": {"message": "chrome not reachable"}}))
                }
                ("GET", "http://h:4444/session/123/badurl") => {
                    return Err(Error::transport("connection refused"));
                }
                _ => (404, json!({"value": {"error": "unknown command", "message": "no route"}})),
            };
            Ok(WireResponse::new(status, body.to_string()))
        }
    }

    /// Opt-in log output for test debugging (`RUST_LOG=webdriver_proxy=trace`).
    fn init_tracing() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init();
        });
    }

    fn mock_proxy(session_id: Option<&str>) -> Proxy {
        init_tracing();
        let mut builder = Proxy::builder()
            .server("h")
            .port(4444)
            .requester(Box::new(MockRequester));
        if let Some(session_id) = session_id {
            builder = builder.session_id(session_id);
        }
        builder.build().expect("valid proxy config")
    }

    // ------------------------------------------------------------------------
    // Test sink
    // ------------------------------------------------------------------------

    #[derive(Default)]
    struct TestSink {
        headers: Vec<(String, String)>,
        sent_code: Option<u16>,
        sent_body: Option<Value>,
    }

    impl ResponseSink for TestSink {
        fn set_header(&mut self, name: &str, value: &str) {
            self.headers.push((name.to_string(), value.to_string()));
        }

        fn send(&mut self, status: u16, body: &Value) {
            self.sent_code = Some(status);
            self.sent_body = Some(body.clone());
        }
    }

    // ------------------------------------------------------------------------
    // Raw proxy
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_proxy_straight() {
        let proxy = mock_proxy(None);
        let (response, body) = proxy.proxy("/status", "GET", None).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(body, json!({"status": 0, "value": {"foo": "bar"}}));
    }

    #[tokio::test]
    async fn test_proxy_saves_session_id_on_creation() {
        let proxy = mock_proxy(None);
        let (response, body) = proxy
            .proxy("/session", "POST", Some(&json!({"desiredCapabilities": {}})))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            body,
            json!({"status": 0, "sessionId": "123", "value": {"browserName": "boo"}})
        );
        assert_eq!(proxy.session_id(), Some("123".to_string()));
    }

    #[tokio::test]
    async fn test_proxy_keeps_seeded_session_id() {
        let proxy = mock_proxy(Some("abc"));
        proxy.proxy("/session", "POST", None).await.unwrap();
        assert_eq!(proxy.session_id(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_proxy_passes_along_transport_errors() {
        let proxy = mock_proxy(Some("123"));
        let err = proxy.proxy("/badurl", "GET", None).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("Could not proxy"));
    }

    #[tokio::test]
    async fn test_proxy_hands_back_error_responses_as_data() {
        let proxy = mock_proxy(Some("123"));
        let (response, body) = proxy.proxy("/element/bad/text", "GET", None).await.unwrap();

        assert_eq!(response.status, 500);
        let outcome = interpret(response.status, body);
        match outcome {
            crate::protocol::Outcome::Failure(err) => {
                assert!(err.is_kind(ErrorKind::ElementNotVisible));
            }
            crate::protocol::Outcome::Success(_) => panic!("expected failure"),
        }
    }

    // ------------------------------------------------------------------------
    // Command proxy
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_command_success() {
        let proxy = mock_proxy(None);
        let value = proxy.command("/status", "GET", None).await.unwrap();
        assert_eq!(value, json!({"foo": "bar"}));
    }

    #[tokio::test]
    async fn test_command_passes_along_transport_errors() {
        let proxy = mock_proxy(Some("123"));
        let err = proxy.command("/badurl", "GET", None).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_command_raises_legacy_failure() {
        let proxy = mock_proxy(Some("123"));
        let err = proxy.command("/element/bad/text", "GET", None).await.unwrap_err();

        assert!(err.is_remote_kind(ErrorKind::ElementNotVisible));
        assert!(err.to_string().contains("Invisible element"));
    }

    #[tokio::test]
    async fn test_command_raises_structured_failure_under_http_200() {
        let proxy = mock_proxy(Some("123"));
        let err = proxy.command("/element/200/text", "GET", None).await.unwrap_err();

        let remote = err.as_remote().expect("remote error");
        assert_eq!(remote.error(), Some("element not visible"));
    }

    #[tokio::test]
    async fn test_command_raises_generic_failure_on_strange_status() {
        let proxy = mock_proxy(Some("123"));
        let err = proxy.command("/nochrome", "GET", None).await.unwrap_err();

        let remote = err.as_remote().expect("remote error");
        assert!(remote.is_kind(ErrorKind::Unknown));
        assert!(remote.message().contains("chrome not reachable"));
    }

    #[tokio::test]
    async fn test_command_requires_session_id() {
        let proxy = mock_proxy(None);
        let err = proxy.command("/element/200/text", "GET", None).await.unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("not set"));
    }

    // ------------------------------------------------------------------------
    // Request/response passthrough
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_passthrough_mirrors_response() {
        let proxy = mock_proxy(None);
        let req = RequestParts::new("GET", "/status", None);
        let mut sink = TestSink::default();

        proxy.proxy_req_res(&req, &mut sink).await.unwrap();

        assert_eq!(sink.sent_code, Some(200));
        assert_eq!(
            sink.sent_body,
            Some(json!({"status": 0, "value": {"foo": "bar"}}))
        );
        assert!(sink.headers.iter().any(|(name, value)| {
            name == "content-type" && value == "application/json; charset=utf-8"
        }));
    }

    #[tokio::test]
    async fn test_passthrough_rewrites_session_id_to_proxy_session() {
        let proxy = mock_proxy(Some("123"));
        let req = RequestParts::new("GET", "/element/200/value", None);
        let mut sink = TestSink::default();

        proxy.proxy_req_res(&req, &mut sink).await.unwrap();

        assert_eq!(
            sink.sent_body,
            Some(json!({"value": "foobar", "sessionId": "123"}))
        );
    }

    #[tokio::test]
    async fn test_passthrough_rewrites_session_id_from_inbound_url() {
        let proxy = mock_proxy(Some("123"));
        let req = RequestParts::new("GET", "/session/456/element/200/value", None);
        let mut sink = TestSink::default();

        proxy.proxy_req_res(&req, &mut sink).await.unwrap();

        assert_eq!(
            sink.sent_body,
            Some(json!({"value": "foobar", "sessionId": "456"}))
        );
    }

    #[tokio::test]
    async fn test_passthrough_forwards_strange_responses_verbatim() {
        let proxy = mock_proxy(Some("123"));
        let req = RequestParts::new("GET", "/nochrome", None);
        let mut sink = TestSink::default();

        proxy.proxy_req_res(&req, &mut sink).await.unwrap();

        assert_eq!(sink.sent_code, Some(100));
        assert_eq!(
            sink.sent_body,
            Some(json!({"value": {"message": "chrome not reachable"}}))
        );
    }

    #[tokio::test]
    async fn test_passthrough_passes_along_transport_errors() {
        let proxy = mock_proxy(Some("123"));
        let req = RequestParts::new("GET", "/badurl", None);
        let mut sink = TestSink::default();

        let err = proxy.proxy_req_res(&req, &mut sink).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(sink.sent_code, None);
    }

    // ------------------------------------------------------------------------
    // URL rewriting through the facade
    // ------------------------------------------------------------------------

    #[test]
    fn test_endpoint_url_uses_current_session() {
        let proxy = mock_proxy(Some("123"));
        assert_eq!(
            proxy
                .endpoint_url("/session/456/element/200/value", "POST")
                .unwrap(),
            "http://h:4444/session/123/element/200/value"
        );
    }

    #[test]
    fn test_endpoint_url_after_session_capture() {
        let proxy = mock_proxy(None);
        tokio_test::block_on(proxy.proxy("/session", "POST", None)).unwrap();
        assert_eq!(
            proxy.endpoint_url("/element/0/text", "GET").unwrap(),
            "http://h:4444/session/123/element/0/text"
        );
    }
}
