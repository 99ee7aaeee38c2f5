//! Response interpretation across the two wire dialects.
//!
//! The downstream server may answer in the legacy numeric-status dialect,
//! the structured-error dialect, or with a bare HTTP status and arbitrary
//! JSON, per endpoint or even per error. Classification therefore resolves
//! an explicit [`Dialect`] first and only then decides success or failure.
//!
//! # Decision Order
//!
//! 1. A numeric `status` field is unambiguous: `0` is success, anything
//!    else is a failure looked up in the legacy catalog.
//! 2. A `value.error` string is explicit about failure independent of the
//!    HTTP status code.
//! 3. Otherwise the HTTP status code is the last-resort signal: 2xx is
//!    success, anything else a generic failure.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::protocol::errors::{ErrorKind, RemoteError};

// ============================================================================
// WireResponse
// ============================================================================

/// Raw transport result of one forwarded call.
///
/// Produced per call and never persisted by the proxy itself; serializable
/// so hosts can log or replay captured exchanges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireResponse {
    /// HTTP status code returned by the downstream server.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl WireResponse {
    /// Creates a wire response.
    #[inline]
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` if the HTTP status code is in the 2xx range.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON, best-effort.
    ///
    /// A body that is not valid JSON is retained verbatim as a JSON string;
    /// decode failure is not an error at this layer.
    #[must_use]
    pub fn decode_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

// ============================================================================
// Dialect
// ============================================================================

/// Wire dialect resolved from a decoded response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    /// Legacy body with a numeric `status` field.
    LegacyStatus(i64),
    /// Structured body with a `value.error` code string.
    StructuredError,
    /// Neither marker present; only the HTTP status code signals failure.
    PlainStatus,
}

/// Resolves the dialect of a decoded body.
fn detect_dialect(body: &Value) -> Dialect {
    if let Some(status) = body.get("status").and_then(Value::as_i64) {
        return Dialect::LegacyStatus(status);
    }
    if body
        .get("value")
        .and_then(|value| value.get("error"))
        .and_then(Value::as_str)
        .is_some()
    {
        return Dialect::StructuredError;
    }
    Dialect::PlainStatus
}

// ============================================================================
// Outcome
// ============================================================================

/// Result of classifying one downstream response.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The response reported success; carries the unwrapped value.
    Success(Value),
    /// The response reported failure; carries the classified error.
    Failure(RemoteError),
}

impl Outcome {
    /// Returns `true` if this outcome is a success.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts the outcome into a `Result`, raising the classified error.
    pub fn into_result(self) -> Result<Value> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error.into()),
        }
    }
}

// ============================================================================
// Interpretation
// ============================================================================

/// Classifies one downstream response into success or failure.
///
/// `body` is the decoded response body as produced by
/// [`WireResponse::decode_body`].
#[must_use]
pub fn interpret(status_code: u16, body: Value) -> Outcome {
    let http_success = (200..300).contains(&status_code);

    match detect_dialect(&body) {
        Dialect::LegacyStatus(0) => Outcome::Success(success_value(body)),
        Dialect::LegacyStatus(status) => {
            let kind = ErrorKind::from_status(status);
            let message = failure_message(&body)
                .unwrap_or_else(|| format!("The remote server returned error status {status}"));
            Outcome::Failure(RemoteError::new(kind, None, message, body))
        }
        Dialect::StructuredError => {
            // Checked by detect_dialect; the string is present.
            let error = body["value"]["error"].as_str().unwrap_or_default().to_string();
            let kind = ErrorKind::from_w3c_error(&error);
            let message = failure_message(&body).unwrap_or_else(|| error.clone());
            Outcome::Failure(RemoteError::new(kind, Some(error), message, body))
        }
        Dialect::PlainStatus if http_success => Outcome::Success(success_value(body)),
        Dialect::PlainStatus => {
            let message = failure_message(&body).unwrap_or_else(|| body.to_string());
            Outcome::Failure(RemoteError::new(ErrorKind::Unknown, None, message, body))
        }
    }
}

/// Unwraps the `value` member of a successful body, or the whole body if
/// there is none.
fn success_value(mut body: Value) -> Value {
    match body.get_mut("value") {
        Some(value) => value.take(),
        None => body,
    }
}

/// Extracts a human-readable message from a failure body.
///
/// Prefers `value.message`, then `value` itself when it is a string, then
/// the raw string of an undecodable body.
fn failure_message(body: &Value) -> Option<String> {
    if let Some(message) = body
        .get("value")
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_string());
    }
    if let Some(message) = body.get("value").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    body.as_str().map(ToString::to_string)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_decode_body_json() {
        let res = WireResponse::new(200, r#"{"status": 0, "value": 42}"#);
        assert_eq!(res.decode_body(), json!({"status": 0, "value": 42}));
    }

    #[test]
    fn test_wire_response_serde() {
        let res = WireResponse::new(500, r#"{"status": 11}"#);
        let encoded = serde_json::to_string(&res).expect("serialize");
        let decoded: WireResponse = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded.status, 500);
        assert_eq!(decoded.body, r#"{"status": 11}"#);
    }

    #[test]
    fn test_decode_body_invalid_json_retained() {
        let res = WireResponse::new(500, "<html>boom</html>");
        assert_eq!(res.decode_body(), json!("<html>boom</html>"));
    }

    #[test]
    fn test_legacy_success_unwraps_value() {
        let outcome = interpret(200, json!({"status": 0, "value": {"foo": "bar"}}));
        match outcome {
            Outcome::Success(value) => assert_eq!(value, json!({"foo": "bar"})),
            Outcome::Failure(_) => panic!("expected success"),
        }
    }

    #[test]
    fn test_legacy_success_without_value_member() {
        let outcome = interpret(200, json!({"status": 0, "sessionId": "123"}));
        match outcome {
            Outcome::Success(value) => {
                assert_eq!(value, json!({"status": 0, "sessionId": "123"}))
            }
            Outcome::Failure(_) => panic!("expected success"),
        }
    }

    #[test]
    fn test_legacy_failure_classified_by_status() {
        let body = json!({"status": 11, "value": {"message": "Invisible element"}});
        let outcome = interpret(500, body.clone());
        match outcome {
            Outcome::Failure(err) => {
                assert!(err.is_kind(ErrorKind::ElementNotVisible));
                assert_eq!(err.message(), "Invisible element");
                assert_eq!(err.error(), None);
                assert_eq!(err.body(), &body);
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_legacy_failure_wins_over_http_success() {
        // A non-zero status is a failure even under HTTP 200.
        let outcome = interpret(200, json!({"status": 7, "value": {"message": "gone"}}));
        match outcome {
            Outcome::Failure(err) => assert!(err.is_kind(ErrorKind::NoSuchElement)),
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_legacy_failure_message_from_string_value() {
        let outcome = interpret(500, json!({"status": 13, "value": "it broke"}));
        match outcome {
            Outcome::Failure(err) => assert_eq!(err.message(), "it broke"),
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_legacy_failure_fallback_message_names_status() {
        let outcome = interpret(500, json!({"status": 21, "value": {}}));
        match outcome {
            Outcome::Failure(err) => {
                assert!(err.is_kind(ErrorKind::Timeout));
                assert!(err.message().contains("21"));
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_structured_error_under_http_200() {
        let outcome = interpret(
            200,
            json!({"value": {"error": "element not visible", "message": "Invisible element"}}),
        );
        match outcome {
            Outcome::Failure(err) => {
                assert!(err.is_kind(ErrorKind::ElementNotVisible));
                assert_eq!(err.error(), Some("element not visible"));
                assert_eq!(err.message(), "Invisible element");
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_structured_error_without_message() {
        let outcome = interpret(404, json!({"value": {"error": "no such element"}}));
        match outcome {
            Outcome::Failure(err) => {
                assert!(err.is_kind(ErrorKind::NoSuchElement));
                assert_eq!(err.message(), "no such element");
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_plain_success_unwraps_value() {
        let outcome = interpret(200, json!({"value": {"ready": true}}));
        match outcome {
            Outcome::Success(value) => assert_eq!(value, json!({"ready": true})),
            Outcome::Failure(_) => panic!("expected success"),
        }
    }

    #[test]
    fn test_plain_failure_generic_kind() {
        // Non-2xx with neither a status field nor a structured error.
        let body = json!({"value": {"message": "chrome not reachable"}});
        let outcome = interpret(100, body);
        match outcome {
            Outcome::Failure(err) => {
                assert!(err.is_kind(ErrorKind::Unknown));
                assert_eq!(err.message(), "chrome not reachable");
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_undecodable_body_success() {
        let res = WireResponse::new(200, "plain text");
        let outcome = interpret(res.status, res.decode_body());
        match outcome {
            Outcome::Success(value) => assert_eq!(value, json!("plain text")),
            Outcome::Failure(_) => panic!("expected success"),
        }
    }

    #[test]
    fn test_undecodable_body_failure() {
        let res = WireResponse::new(502, "bad gateway");
        let outcome = interpret(res.status, res.decode_body());
        match outcome {
            Outcome::Failure(err) => {
                assert!(err.is_kind(ErrorKind::Unknown));
                assert_eq!(err.message(), "bad gateway");
            }
            Outcome::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_into_result() {
        assert!(Outcome::Success(json!(1)).into_result().is_ok());

        let failure = interpret(500, json!({"status": 7, "value": {"message": "gone"}}));
        let err = failure.into_result().unwrap_err();
        assert!(err.is_remote_kind(ErrorKind::NoSuchElement));
    }
}
