//! WebDriver Proxy - Session-aware reverse proxy for remote-control servers.
//!
//! This library sits between an automation client and a remote
//! WebDriver-compatible server. It forwards commands while:
//!
//! - rewriting request paths so the client-visible session identifier is
//!   decoupled from the identifier obtained upstream (base-path stripping,
//!   legacy-prefix compatibility, session-id substitution, query
//!   preservation), and
//! - translating the two wire dialects of the protocol family — the legacy
//!   numeric-status dialect and the structured-error dialect — into one
//!   error taxonomy.
//!
//! # Quick Start
//!
//! ```no_run
//! use webdriver_proxy::{Proxy, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let proxy = Proxy::builder()
//!         .server("127.0.0.1")
//!         .port(4444)
//!         .build()?;
//!
//!     // Create a session downstream; the proxy captures the new id.
//!     let caps = serde_json::json!({"capabilities": {}});
//!     proxy.command("/session", "POST", Some(&caps)).await?;
//!
//!     // Session-scoped commands carry the captured id automatically.
//!     let title = proxy.command("/title", "GET", None).await?;
//!     println!("title: {title}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Operations
//!
//! | Entry point | Failure policy |
//! |-------------|----------------|
//! | [`Proxy::proxy`] | raw response + decoded body; only transport/config errors raise |
//! | [`Proxy::command`] | success value, or the classified [`RemoteError`] raises |
//! | [`Proxy::proxy_req_res`] | mirrors the downstream response to a sink verbatim |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | Error taxonomy and response classification |
//! | [`proxy`] | The [`Proxy`] facade, builder, and passthrough traits |
//! | [`transport`] | HTTP transport seam |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Wire protocol types: error taxonomy and response classification.
pub mod protocol;

/// Proxy facade: configuration, URL rewriting, and the public operations.
pub mod proxy;

/// HTTP transport seam.
///
/// The [`HttpRequester`] trait performs the single outbound call per
/// operation; the default implementation wraps reqwest.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Protocol types
pub use protocol::{ErrorKind, Outcome, RemoteError, WireResponse};

// Proxy types
pub use proxy::{ProxiedRequest, Proxy, ProxyBuilder, RequestParts, ResponseSink};

// Transport types
pub use transport::{HttpRequester, ReqwestRequester};
