//! Builder pattern for proxy configuration.
//!
//! Provides a fluent API for configuring and creating [`Proxy`] instances.
//!
//! # Example
//!
//! ```no_run
//! use webdriver_proxy::Proxy;
//!
//! # fn example() -> webdriver_proxy::Result<()> {
//! let proxy = Proxy::builder()
//!     .server("127.0.0.1")
//!     .port(4723)
//!     .base_path("/wd/hub")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};
use crate::transport::{HttpRequester, ReqwestRequester};

use super::core::Proxy;

// ============================================================================
// ProxyConfig
// ============================================================================

/// Immutable downstream-server configuration owned by one [`Proxy`].
#[derive(Debug, Clone)]
pub(crate) struct ProxyConfig {
    /// Downstream host.
    pub(crate) server: String,
    /// Downstream port.
    pub(crate) port: u16,
    /// URL scheme, `http` unless overridden.
    pub(crate) scheme: String,
    /// Prefix stripped from inbound requests before path matching.
    /// Empty means "no stripping beyond legacy compatibility".
    pub(crate) base_path: String,
}

// ============================================================================
// ProxyBuilder
// ============================================================================

/// Builder for configuring a [`Proxy`] instance.
///
/// Use [`Proxy::builder()`] to create a new builder.
#[derive(Default)]
pub struct ProxyBuilder {
    server: Option<String>,
    port: Option<u16>,
    scheme: Option<String>,
    base_path: Option<String>,
    session_id: Option<String>,
    requester: Option<Box<dyn HttpRequester>>,
}

impl std::fmt::Debug for ProxyBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyBuilder")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("base_path", &self.base_path)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ProxyBuilder Implementation
// ============================================================================

impl ProxyBuilder {
    /// Creates a new proxy builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the downstream server host. Required.
    #[inline]
    #[must_use]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Sets the downstream server port. Required.
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the URL scheme. Defaults to `http`.
    #[inline]
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Sets the base path stripped from inbound requests.
    ///
    /// Defaults to empty, which enables legacy-prefix compatibility
    /// stripping instead.
    #[inline]
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Pre-seeds the proxy session id.
    ///
    /// A seeded id is never replaced by session-creation responses.
    #[inline]
    #[must_use]
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the HTTP transport implementation.
    ///
    /// Defaults to a [`ReqwestRequester`] with a default client.
    #[inline]
    #[must_use]
    pub fn requester(mut self, requester: Box<dyn HttpRequester>) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Builds the proxy with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `server` or `port` is not set
    pub fn build(self) -> Result<Proxy> {
        let server = self
            .server
            .filter(|server| !server.is_empty())
            .ok_or_else(|| {
                Error::config("Downstream server host is required. Use .server() to set it.")
            })?;
        let port = self
            .port
            .ok_or_else(|| Error::config("Downstream server port is required. Use .port() to set it."))?;

        let config = ProxyConfig {
            server,
            port,
            scheme: self.scheme.unwrap_or_else(|| "http".to_string()),
            base_path: self.base_path.unwrap_or_default(),
        };
        let requester = self
            .requester
            .unwrap_or_else(|| Box::new(ReqwestRequester::new()));

        Ok(Proxy::from_parts(config, self.session_id, requester))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let proxy = ProxyBuilder::new().server("h").port(4444).build().unwrap();
        assert_eq!(proxy.server(), "h");
        assert_eq!(proxy.port(), 4444);
        assert_eq!(proxy.scheme(), "http");
        assert_eq!(proxy.base_path(), "");
        assert_eq!(proxy.session_id(), None);
    }

    #[test]
    fn test_build_with_overrides() {
        let proxy = ProxyBuilder::new()
            .server("127.0.0.2")
            .port(4723)
            .scheme("https")
            .base_path("/wd/hub")
            .session_id("123")
            .build()
            .unwrap();
        assert_eq!(proxy.server(), "127.0.0.2");
        assert_eq!(proxy.scheme(), "https");
        assert_eq!(proxy.base_path(), "/wd/hub");
        assert_eq!(proxy.session_id(), Some("123".to_string()));
    }

    #[test]
    fn test_build_requires_server() {
        let err = ProxyBuilder::new().port(4444).build().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_build_requires_port() {
        let err = ProxyBuilder::new().server("h").build().unwrap_err();
        assert!(err.is_config());
    }
}
