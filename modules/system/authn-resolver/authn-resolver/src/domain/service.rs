//! `AuthN` resolver service.
//!
//! Ties the token codec to principal resolution: a raw `Authorization`
//! header goes in, a [`SecurityContext`] carrying the caller's principal
//! comes out.

use std::sync::Arc;

use authn_resolver_sdk::{AccountStore, AuthenticationResult, IssuedToken};
use k5_security::SecurityContext;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use super::error::DomainError;
use super::principal_resolver::PrincipalResolver;
use super::token_codec::TokenCodec;
use crate::config::AuthNResolverConfig;

/// `AuthN` resolver service.
pub struct Service {
    codec: TokenCodec,
    resolver: PrincipalResolver,
}

impl Service {
    #[must_use]
    pub fn new(codec: TokenCodec, resolver: PrincipalResolver) -> Self {
        Self { codec, resolver }
    }

    /// Build the service from configuration over the given account store.
    ///
    /// # Errors
    ///
    /// `InvalidSecret` if the configured secret is unusable.
    pub fn from_config(
        cfg: &AuthNResolverConfig,
        accounts: Arc<dyn AccountStore>,
    ) -> Result<Self, DomainError> {
        let codec = TokenCodec::from_config(cfg)?;
        info!(
            token_ttl_secs = codec.lifetime().as_secs(),
            clock_skew_secs = codec.skew().tolerance_secs(),
            identity = cfg.identity.as_str(),
            "authn resolver configured"
        );
        if cfg.clock_skew.is_zero() {
            warn!("clock skew tolerance is zero; tokens are rejected the second they expire");
        }
        Ok(Self::new(
            codec,
            PrincipalResolver::new(accounts, cfg.identity),
        ))
    }

    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    #[must_use]
    pub fn resolver(&self) -> &PrincipalResolver {
        &self.resolver
    }

    /// Authenticate a raw `Authorization` header value.
    ///
    /// Just-expired tokens within the configured skew are accepted.
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` if the header is not a bearer header
    /// - `InvalidToken` / `Expired` from verification
    /// - `AccountNotFound` if the subject names no account
    /// - `StoreUnavailable` if the account store fails
    #[tracing::instrument(skip_all)]
    pub async fn authenticate(
        &self,
        authorization_header: &str,
    ) -> Result<AuthenticationResult, DomainError> {
        let token = TokenCodec::strip_prefix(authorization_header)?;
        let claims = self.codec.verify(token, true)?;
        let principal = self.resolver.resolve(claims.subject()).await?;

        debug!(account_id = principal.id(), "request authenticated");

        let security_context = SecurityContext::builder()
            .principal(principal)
            .bearer_token(SecretString::from(token.to_owned()))
            .build();

        Ok(AuthenticationResult {
            security_context,
            claims,
        })
    }

    /// Time left on `token`; negative once expired. Signature must be valid.
    ///
    /// # Errors
    ///
    /// `InvalidToken` for bad signatures or corrupt structure.
    pub fn remaining_lifetime(&self, token: &str) -> Result<time::Duration, DomainError> {
        self.codec.remaining_lifetime(token)
    }

    /// Issue a token for the account named by `identifier`.
    ///
    /// The token subject is the account's identifier in the configured
    /// namespace; its roles are the account's current roles.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account matches, or it has no identifier in
    ///   the configured namespace
    /// - `StoreUnavailable` if the account store fails
    #[tracing::instrument(skip_all)]
    pub async fn issue_for_account(&self, identifier: &str) -> Result<IssuedToken, DomainError> {
        let principal = self.resolver.resolve(identifier).await?;
        let subject = principal
            .identity(self.resolver.namespace())
            .ok_or_else(|| DomainError::AccountNotFound(identifier.trim().to_owned()))?;

        let token = self.codec.issue(subject, principal.roles())?;
        info!(account_id = principal.id(), "issued bearer token");

        Ok(IssuedToken {
            access_token: SecretString::from(token),
            token_type: "Bearer",
            expires_in: self.codec.lifetime().as_secs(),
        })
    }
}
