//! Error types for the WebDriver proxy.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webdriver_proxy::{Proxy, Result};
//!
//! async fn example(proxy: &Proxy) -> Result<()> {
//!     let value = proxy.command("/url", "GET", None).await?;
//!     println!("current url: {value}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Transport | [`Error::Transport`] |
//! | Remote | [`Error::Remote`] |
//! | External | [`Error::Json`], [`Error::UrlParse`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::protocol::errors::{ErrorKind, RemoteError};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration or caller-usage error.
    ///
    /// Returned when proxy configuration is invalid, or when a request
    /// path requires a session id and none is set.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// The forward call to the downstream server could not complete.
    ///
    /// Covers connection refusal, DNS failure, timeouts, and nonexistent
    /// endpoints. Non-2xx HTTP statuses are *not* transport errors; those
    /// come back as ordinary responses.
    #[error("Could not proxy command to remote server. Original error: {message}")]
    Transport {
        /// The original cause, rendered as text.
        message: String,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// Classified failure reported by the downstream server.
    ///
    /// Raised by [`Proxy::command`](crate::Proxy::command) only; the raw
    /// and passthrough entry points hand classification back as data.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a transport error from its original cause.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates the "session id required but not set" configuration error.
    #[inline]
    pub fn session_not_set() -> Self {
        Self::config("Cannot proxy a session command because the session id is not set")
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a configuration error.
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns `true` if this is a transport error.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if this is a classified remote error.
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Returns the remote error payload, if any.
    #[inline]
    #[must_use]
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(remote) => Some(remote),
            _ => None,
        }
    }

    /// Returns `true` if this is a remote error of the given kind.
    #[inline]
    #[must_use]
    pub fn is_remote_kind(&self, kind: ErrorKind) -> bool {
        self.as_remote().is_some_and(|remote| remote.is_kind(kind))
    }
}

// ============================================================================
// Tests
// ============================================================================
