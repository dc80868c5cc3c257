//! Domain models for the `AuthN` resolver module.

use std::collections::BTreeSet;

use k5_security::SecurityContext;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::claims::TokenClaims;

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Security context carrying the resolved principal and the original
    /// bearer token.
    pub security_context: SecurityContext,
    /// Verified claims the principal was resolved from.
    pub claims: TokenClaims,
}

/// Account as returned by an [`AccountStore`](crate::AccountStore).
///
/// `roles` is always fully materialized; stores must not hand out accounts
/// whose role set is still pending a lazy load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountRecord {
    pub id: i64,
    pub login_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

/// Token issued for an account.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact encoded token.
    pub access_token: SecretString,
    /// Always `"Bearer"`.
    pub token_type: &'static str,
    /// Lifetime in seconds at issuance.
    pub expires_in: u64,
}
