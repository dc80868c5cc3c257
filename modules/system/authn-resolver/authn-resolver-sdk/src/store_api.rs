//! Account storage contract consumed by the `AuthN` resolver.
//!
//! The resolver does not own account persistence. Any backing store (SQL,
//! directory service, static configuration) implements this trait.

use async_trait::async_trait;
use k5_security::IdentityNamespace;

use crate::error::AuthNResolverError;
use crate::models::AccountRecord;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch an account together with its role set.
    ///
    /// `identifier` is interpreted in `namespace` (login id or email).
    /// Implementations must load roles eagerly.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the store cannot be reached
    /// - `Internal` for unexpected storage faults
    ///
    /// A missing account is `Ok(None)`, not an error.
    async fn find_with_roles(
        &self,
        namespace: IdentityNamespace,
        identifier: &str,
    ) -> Result<Option<AccountRecord>, AuthNResolverError>;
}
