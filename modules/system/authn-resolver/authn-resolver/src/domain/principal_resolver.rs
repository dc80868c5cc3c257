//! Verified subject -> [`Principal`] mapping.

use std::any::Any;
use std::sync::Arc;

use authn_resolver_sdk::{AccountRecord, AccountStore};
use k5_security::{IdentityNamespace, Principal};
use tracing::debug;

use super::error::DomainError;

/// Turns a verified token subject into the caller's [`Principal`].
///
/// Never inspects tokens; subjects handed in are assumed to be verified.
pub struct PrincipalResolver {
    accounts: Arc<dyn AccountStore>,
    namespace: IdentityNamespace,
}

impl PrincipalResolver {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, namespace: IdentityNamespace) -> Self {
        Self {
            accounts,
            namespace,
        }
    }

    /// Namespace subjects are looked up in.
    #[must_use]
    pub fn namespace(&self) -> IdentityNamespace {
        self.namespace
    }

    /// Look up the account named by `subject` and build its principal.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if `subject` is blank or no account matches
    /// - `StoreUnavailable` if the account store fails
    pub async fn resolve(&self, subject: &str) -> Result<Principal, DomainError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(DomainError::AccountNotFound(String::new()));
        }

        let account = self
            .accounts
            .find_with_roles(self.namespace, subject)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::AccountNotFound(subject.to_owned()))?;

        debug!(
            account_id = account.id,
            namespace = self.namespace.as_str(),
            "resolved principal"
        );
        Ok(principal_of(account))
    }

    /// Numeric account id of any principal-shaped value, `None` otherwise.
    #[must_use]
    pub fn account_id_of(subject: &dyn Any) -> Option<i64> {
        k5_security::account_id_of(subject)
    }
}

fn principal_of(account: AccountRecord) -> Principal {
    let principal = Principal::new(account.id, account.login_id, account.roles);
    match account.email {
        Some(email) => principal.with_email(email),
        None => principal,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use authn_resolver_sdk::AuthNResolverError;
    use k5_security::roles::{ADMIN, USER};

    use super::*;
    use crate::infra::StaticAccountStore;

    fn accounts() -> Arc<dyn AccountStore> {
        Arc::new(StaticAccountStore::new([AccountRecord {
            id: 11,
            login_id: "alice".to_owned(),
            email: Some("a@example.com".to_owned()),
            roles: [USER.to_owned(), ADMIN.to_owned()].into(),
        }]))
    }

    struct FailingStore;

    #[async_trait]
    impl AccountStore for FailingStore {
        async fn find_with_roles(
            &self,
            _namespace: IdentityNamespace,
            _identifier: &str,
        ) -> Result<Option<AccountRecord>, AuthNResolverError> {
            Err(AuthNResolverError::ServiceUnavailable("db down".to_owned()))
        }
    }

    #[tokio::test]
    async fn resolves_by_login_id() {
        let resolver = PrincipalResolver::new(accounts(), IdentityNamespace::LoginId);
        let p = resolver.resolve("alice").await.unwrap();
        assert_eq!(p.id(), 11);
        assert_eq!(p.login_id(), "alice");
        assert_eq!(p.email(), Some("a@example.com"));
        assert!(p.has_role(ADMIN) && p.has_role(USER));
    }

    #[tokio::test]
    async fn email_namespace_looks_up_by_email() {
        let resolver = PrincipalResolver::new(accounts(), IdentityNamespace::Email);
        assert_eq!(resolver.resolve("a@example.com").await.unwrap().id(), 11);
        assert!(matches!(
            resolver.resolve("alice").await,
            Err(DomainError::AccountNotFound(s)) if s == "alice"
        ));
    }

    #[tokio::test]
    async fn blank_and_unknown_subjects_are_not_found() {
        let resolver = PrincipalResolver::new(accounts(), IdentityNamespace::LoginId);
        for subject in ["", "   ", "ghost"] {
            assert!(matches!(
                resolver.resolve(subject).await,
                Err(DomainError::AccountNotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn store_failure_is_infrastructure() {
        let resolver = PrincipalResolver::new(Arc::new(FailingStore), IdentityNamespace::LoginId);
        let err = resolver.resolve("alice").await.unwrap_err();
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
        assert!(err.is_infrastructure());
    }

    #[test]
    fn account_id_of_delegates() {
        let p = Principal::new(5, "x", [USER]);
        assert_eq!(PrincipalResolver::account_id_of(&p), Some(5));
        assert_eq!(PrincipalResolver::account_id_of(&"x"), None);
    }
}
