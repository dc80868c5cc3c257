//! Error types for the `AuthZ` resolver module.

use thiserror::Error;

/// Errors that can occur when using the `AuthZ` resolver API.
///
/// These represent infrastructure failures only.
/// Access denial is expressed as `Ok(false)`, not as an error variant.
#[derive(Debug, Error)]
pub enum AuthZResolverError {
    /// The resource store cannot be reached.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
