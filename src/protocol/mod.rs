//! Wire protocol types: error taxonomy and response classification.

/// Remote error taxonomy: [`ErrorKind`] lookups and [`RemoteError`].
pub mod errors;

/// Response classification across the two wire dialects.
pub mod response;

pub use errors::{ErrorKind, RemoteError};
pub use response::{Outcome, WireResponse, interpret};
