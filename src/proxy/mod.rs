//! Proxy facade: configuration, URL rewriting, and the public operations.

/// Builder for proxy configuration.
pub mod builder;

/// Core [`Proxy`] struct and operations.
pub mod core;

/// Boundary traits for HTTP request/response passthrough.
pub mod passthrough;

/// URL rewriting (internal).
pub(crate) mod rewrite;

pub use builder::ProxyBuilder;
pub use core::Proxy;
pub use passthrough::{ProxiedRequest, RequestParts, ResponseSink};
