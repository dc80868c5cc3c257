//! Error types for the `AuthN` resolver module.

use thiserror::Error;

/// Errors that can occur when using the `AuthN` resolver API.
///
/// `Expired` and `InvalidToken` are kept apart so callers can tell
/// "log in again" from "tampering detected".
#[derive(Debug, Error)]
pub enum AuthNResolverError {
    /// The signing secret is malformed or shorter than 256 bits.
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),

    /// The `Authorization` header is missing or lacks the `Bearer ` prefix.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Signature mismatch, structural corruption or missing required claims.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The token expired and the skew tolerance (if any) is exhausted.
    #[error("token expired")]
    Expired,

    /// The subject does not resolve to a known account.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// The account store is not reachable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
