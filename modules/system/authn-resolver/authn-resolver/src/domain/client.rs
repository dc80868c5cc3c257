//! In-process `AuthNResolverClient` implementation.

use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNResolverClient, AuthNResolverError, AuthenticationResult, IssuedToken,
};

use super::{DomainError, Service};

fn log_and_convert(op: &str, e: DomainError) -> AuthNResolverError {
    if e.is_infrastructure() {
        tracing::error!(operation = op, error = ?e, "authn_resolver call failed");
    } else {
        tracing::debug!(operation = op, error = %e, "authn_resolver rejected request");
    }
    e.into()
}

#[async_trait]
impl AuthNResolverClient for Service {
    async fn authenticate(
        &self,
        authorization_header: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        Service::authenticate(self, authorization_header)
            .await
            .map_err(|e| log_and_convert("authenticate", e))
    }

    async fn issue_for_account(&self, identifier: &str) -> Result<IssuedToken, AuthNResolverError> {
        Service::issue_for_account(self, identifier)
            .await
            .map_err(|e| log_and_convert("issue_for_account", e))
    }
}
