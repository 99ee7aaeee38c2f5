//! Remote error taxonomy.
//!
//! The downstream server reports failures in two dialects: the legacy
//! protocol uses a numeric `status` code, the structured dialect uses an
//! `error` code string. Both resolve to one [`ErrorKind`] here.
//!
//! # Lookup Surface
//!
//! | Operation | Direction |
//! |-----------|-----------|
//! | [`ErrorKind::from_status`] | legacy numeric code → kind |
//! | [`ErrorKind::from_w3c_error`] | structured code string → kind |
//! | [`ErrorKind::status`] | kind → legacy numeric code |
//! | [`ErrorKind::w3c_error`] | kind → structured code string |
//! | [`RemoteError::is_kind`] | classified error → kind test |

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

// ============================================================================
// ErrorKind
// ============================================================================

/// Semantic kind of a failure reported by the downstream server.
///
/// Numeric codes follow the legacy protocol's status catalog; the string
/// codes follow the structured dialect. [`ErrorKind::Unknown`] doubles as
/// the generic fallback for responses that fit neither catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No session matching the given id (status 6).
    NoSuchDriver,
    /// Element could not be found (status 7).
    NoSuchElement,
    /// Frame could not be found (status 8).
    NoSuchFrame,
    /// Command not recognized by the remote end (status 9).
    UnknownCommand,
    /// Element reference is no longer attached to the DOM (status 10).
    StaleElementReference,
    /// Element exists but is not visible (status 11).
    ElementNotVisible,
    /// Element is in a state that forbids the action (status 12).
    InvalidElementState,
    /// Unclassified remote failure; also the generic fallback (status 13).
    Unknown,
    /// Element cannot be selected (status 15).
    ElementIsNotSelectable,
    /// Error while executing injected JavaScript (status 17).
    JavaScriptError,
    /// XPath lookup failed (status 19).
    XPathLookupError,
    /// Operation did not complete in time (status 21).
    Timeout,
    /// Window could not be found (status 23).
    NoSuchWindow,
    /// Cookie domain invalid for the current page (status 24).
    InvalidCookieDomain,
    /// Cookie could not be set (status 25).
    UnableToSetCookie,
    /// A modal dialog was open, blocking the command (status 26).
    UnexpectedAlertOpen,
    /// No alert open to operate on (status 27).
    NoAlertOpen,
    /// Injected script did not complete in time (status 28).
    ScriptTimeout,
    /// Coordinates outside the element bounds (status 29).
    InvalidElementCoordinates,
    /// IME not available (status 30).
    ImeNotAvailable,
    /// IME engine could not be activated (status 31).
    ImeEngineActivationFailed,
    /// Selector is syntactically invalid (status 32).
    InvalidSelector,
    /// A new session could not be created (status 33).
    SessionNotCreated,
    /// Move target outside the viewport (status 34).
    MoveTargetOutOfBounds,
}

// ============================================================================
// ErrorKind - Lookup
// ============================================================================

impl ErrorKind {
    /// Looks up the kind for a legacy numeric status code.
    ///
    /// Unrecognized codes resolve to [`ErrorKind::Unknown`]. Status `0`
    /// means success and must be handled before lookup.
    #[must_use]
    pub fn from_status(status: i64) -> Self {
        match status {
            6 => Self::NoSuchDriver,
            7 => Self::NoSuchElement,
            8 => Self::NoSuchFrame,
            9 => Self::UnknownCommand,
            10 => Self::StaleElementReference,
            11 => Self::ElementNotVisible,
            12 => Self::InvalidElementState,
            15 => Self::ElementIsNotSelectable,
            17 => Self::JavaScriptError,
            19 => Self::XPathLookupError,
            21 => Self::Timeout,
            23 => Self::NoSuchWindow,
            24 => Self::InvalidCookieDomain,
            25 => Self::UnableToSetCookie,
            26 => Self::UnexpectedAlertOpen,
            27 => Self::NoAlertOpen,
            28 => Self::ScriptTimeout,
            29 => Self::InvalidElementCoordinates,
            30 => Self::ImeNotAvailable,
            31 => Self::ImeEngineActivationFailed,
            32 => Self::InvalidSelector,
            33 => Self::SessionNotCreated,
            34 => Self::MoveTargetOutOfBounds,
            _ => Self::Unknown,
        }
    }

    /// Looks up the kind for a structured-dialect error code string.
    ///
    /// Unrecognized codes resolve to [`ErrorKind::Unknown`].
    #[must_use]
    pub fn from_w3c_error(error: &str) -> Self {
        match error {
            "invalid session id" => Self::NoSuchDriver,
            "no such element" => Self::NoSuchElement,
            "no such frame" => Self::NoSuchFrame,
            "unknown command" => Self::UnknownCommand,
            "stale element reference" => Self::StaleElementReference,
            "element not visible" => Self::ElementNotVisible,
            "invalid element state" => Self::InvalidElementState,
            "element not selectable" => Self::ElementIsNotSelectable,
            "javascript error" => Self::JavaScriptError,
            "timeout" => Self::Timeout,
            "no such window" => Self::NoSuchWindow,
            "invalid cookie domain" => Self::InvalidCookieDomain,
            "unable to set cookie" => Self::UnableToSetCookie,
            "unexpected alert open" => Self::UnexpectedAlertOpen,
            "no such alert" => Self::NoAlertOpen,
            "script timeout" => Self::ScriptTimeout,
            "invalid coordinates" => Self::InvalidElementCoordinates,
            "ime not available" => Self::ImeNotAvailable,
            "ime engine activation failed" => Self::ImeEngineActivationFailed,
            "invalid selector" => Self::InvalidSelector,
            "session not created" => Self::SessionNotCreated,
            "move target out of bounds" => Self::MoveTargetOutOfBounds,
            _ => Self::Unknown,
        }
    }

    /// Returns the legacy numeric status code for this kind.
    #[must_use]
    pub fn status(self) -> i64 {
        match self {
            Self::NoSuchDriver => 6,
            Self::NoSuchElement => 7,
            Self::NoSuchFrame => 8,
            Self::UnknownCommand => 9,
            Self::StaleElementReference => 10,
            Self::ElementNotVisible => 11,
            Self::InvalidElementState => 12,
            Self::Unknown => 13,
            Self::ElementIsNotSelectable => 15,
            Self::JavaScriptError => 17,
            Self::XPathLookupError => 19,
            Self::Timeout => 21,
            Self::NoSuchWindow => 23,
            Self::InvalidCookieDomain => 24,
            Self::UnableToSetCookie => 25,
            Self::UnexpectedAlertOpen => 26,
            Self::NoAlertOpen => 27,
            Self::ScriptTimeout => 28,
            Self::InvalidElementCoordinates => 29,
            Self::ImeNotAvailable => 30,
            Self::ImeEngineActivationFailed => 31,
            Self::InvalidSelector => 32,
            Self::SessionNotCreated => 33,
            Self::MoveTargetOutOfBounds => 34,
        }
    }

    /// Returns the structured-dialect error code string for this kind.
    #[must_use]
    pub fn w3c_error(self) -> &'static str {
        match self {
            Self::NoSuchDriver => "invalid session id",
            Self::NoSuchElement => "no such element",
            Self::NoSuchFrame => "no such frame",
            Self::UnknownCommand => "unknown command",
            Self::StaleElementReference => "stale element reference",
            Self::ElementNotVisible => "element not visible",
            Self::InvalidElementState => "invalid element state",
            Self::Unknown => "unknown error",
            Self::ElementIsNotSelectable => "element not selectable",
            Self::JavaScriptError => "javascript error",
            Self::XPathLookupError | Self::InvalidSelector => "invalid selector",
            Self::Timeout => "timeout",
            Self::NoSuchWindow => "no such window",
            Self::InvalidCookieDomain => "invalid cookie domain",
            Self::UnableToSetCookie => "unable to set cookie",
            Self::UnexpectedAlertOpen => "unexpected alert open",
            Self::NoAlertOpen => "no such alert",
            Self::ScriptTimeout => "script timeout",
            Self::InvalidElementCoordinates => "invalid coordinates",
            Self::ImeNotAvailable => "ime not available",
            Self::ImeEngineActivationFailed => "ime engine activation failed",
            Self::SessionNotCreated => "session not created",
            Self::MoveTargetOutOfBounds => "move target out of bounds",
        }
    }
}

// ============================================================================
// RemoteError
// ============================================================================

/// A classified failure reported by the downstream server.
///
/// Carries the resolved [`ErrorKind`], the verbatim error code string when
/// the structured dialect supplied one, a human-readable message, and the
/// decoded response body for caller inspection.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RemoteError {
    kind: ErrorKind,
    error: Option<String>,
    message: String,
    body: Value,
}

impl RemoteError {
    /// Creates a classified remote error.
    #[must_use]
    pub fn new(
        kind: ErrorKind,
        error: Option<String>,
        message: impl Into<String>,
        body: Value,
    ) -> Self {
        Self {
            kind,
            error,
            message: message.into(),
            body,
        }
    }

    /// Returns the resolved error kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the verbatim structured-dialect error code, if the response
    /// carried one.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the human-readable message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the decoded response body this error was classified from.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Returns `true` if this error is of the given kind.
    #[inline]
    #[must_use]
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

// ============================================================================
// Tests
// ============================================================================
