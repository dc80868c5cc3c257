//! Public API trait for the `AuthN` resolver.
//!
//! This trait defines the interface that consumers use to authenticate
//! bearer tokens.

use async_trait::async_trait;

use crate::error::AuthNResolverError;
use crate::models::{AuthenticationResult, IssuedToken};

/// Public API trait for the `AuthN` resolver.
///
/// Consumed primarily by the API gateway:
///
/// ```ignore
/// let result = authn.authenticate(header_value).await?;
/// request.extensions_mut().insert(result.security_context);
/// ```
///
/// # Security
///
/// The returned `SecurityContext` carries the original bearer token
/// wrapped in a `SecretString`.
#[async_trait]
pub trait AuthNResolverClient: Send + Sync {
    /// Authenticate a raw `Authorization` header value.
    ///
    /// Strips the `Bearer ` prefix, verifies the token (tolerating clock
    /// skew right after expiry) and resolves the subject into a principal.
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` if the header lacks the `Bearer ` prefix
    /// - `InvalidToken` if the signature or structure is bad
    /// - `Expired` if the token expired beyond the skew tolerance
    /// - `AccountNotFound` if the subject has no account
    /// - `ServiceUnavailable`/`Internal` for account store faults
    async fn authenticate(
        &self,
        authorization_header: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError>;

    /// Issue a token for an existing account.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account matches `identifier`
    /// - `ServiceUnavailable`/`Internal` for account store faults
    async fn issue_for_account(&self, identifier: &str)
    -> Result<IssuedToken, AuthNResolverError>;
}
