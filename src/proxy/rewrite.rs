//! URL rewriting for forwarded requests.
//!
//! Maps an inbound request path and method to an absolute URL against the
//! configured downstream server: base-path or legacy-prefix stripping,
//! session-id substitution, query preservation. Pure given the proxy
//! configuration and current session id.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::proxy::builder::ProxyConfig;

// ============================================================================
// Constants
// ============================================================================

/// Compatibility prefix recognized only when no base path is configured.
///
/// Older clients prefix every request with this segment.
pub(crate) const LEGACY_PREFIX: &str = "/wd/hub";

/// Session-scoped path shape: `/session/<id>` or `/session/<id>/<rest>`.
static SESSION_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/session/([^/]+)(/.*)?$").expect("valid regex"));

// ============================================================================
// Session Requirement Table
// ============================================================================

/// Decides whether a stripped path must carry a session id.
///
/// The session-agnostic endpoints are a fixed table; everything else is
/// implicitly scoped to the current session.
fn requires_session_id(path: &str, method: &str) -> bool {
    match path {
        "" | "/" | "/status" | "/sessions" | "/appium/sessions" => false,
        // POST /session creates a session; any other method on the bare
        // path means "act on the current session".
        "/session" => !method.eq_ignore_ascii_case("POST"),
        _ => true,
    }
}

// ============================================================================
// Rewriting
// ============================================================================

/// Rewrites an inbound path into an absolute downstream URL.
///
/// # Errors
///
/// - [`Error::Config`] if a configured base path does not match, or if the
///   path requires a session id and none is set
/// - [`Error::UrlParse`] if an absolute inbound URL cannot be parsed
pub(crate) fn rewrite_url(
    config: &ProxyConfig,
    session_id: Option<&str>,
    inbound: &str,
    method: &str,
) -> Result<String> {
    let (path, query) = split_target(inbound)?;
    let path = strip_inbound_prefix(&path, config)?;
    let path = if path == "/" { "" } else { path };

    let rewritten = if let Some(caps) = SESSION_PATH_RE.captures(path) {
        // The inbound session id is never trusted; substitute our own.
        let sid = require_session(session_id)?;
        let rest = caps.get(2).map_or("", |m| m.as_str());
        format!("/session/{sid}{rest}")
    } else if !requires_session_id(path, method) {
        path.to_string()
    } else if path == "/session" {
        format!("/session/{}", require_session(session_id)?)
    } else {
        format!("/session/{}{path}", require_session(session_id)?)
    };

    let mut url = format!(
        "{}://{}:{}{rewritten}",
        config.scheme, config.server, config.port
    );
    if let Some(query) = query {
        url.push('?');
        url.push_str(&query);
    }
    Ok(url)
}

/// Extracts the session id named by an inbound path, if any.
///
/// Applies the same prefix stripping as [`rewrite_url`] so the shape check
/// sees the protocol-level path.
pub(crate) fn session_id_from_path(config: &ProxyConfig, inbound: &str) -> Option<String> {
    let (path, _) = split_target(inbound).ok()?;
    let path = strip_inbound_prefix(&path, config).ok()?;
    SESSION_PATH_RE
        .captures(path)
        .map(|caps| caps[1].to_string())
}

// ============================================================================
// Helpers
// ============================================================================

/// Reduces an inbound target to its path and query.
///
/// Absolute URLs are accepted for compatibility; their scheme, host, and
/// port are discarded.
fn split_target(inbound: &str) -> Result<(String, Option<String>)> {
    if inbound.starts_with("http://") || inbound.starts_with("https://") {
        let url = Url::parse(inbound)?;
        return Ok((url.path().to_string(), url.query().map(ToString::to_string)));
    }
    match inbound.split_once('?') {
        Some((path, query)) => Ok((path.to_string(), Some(query.to_string()))),
        None => Ok((inbound.to_string(), None)),
    }
}

/// Strips the configured base path, or the legacy prefix when no base path
/// is configured. The two are mutually exclusive; at most one prefix is
/// removed, and only at the start of the path.
fn strip_inbound_prefix<'a>(path: &'a str, config: &ProxyConfig) -> Result<&'a str> {
    if !config.base_path.is_empty() {
        return strip_segment_prefix(path, &config.base_path).ok_or_else(|| {
            Error::config(format!(
                "Request path {path} does not start with the base path {}",
                config.base_path
            ))
        });
    }
    Ok(strip_segment_prefix(path, LEGACY_PREFIX).unwrap_or(path))
}

/// Strips `prefix` only when the remainder is empty or a path boundary.
fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn require_session(session_id: Option<&str>) -> Result<&str> {
    session_id.ok_or_else(Error::session_not_set)
}

// ============================================================================
// Tests
// ============================================================================
