//! In-memory account store backed by configuration.

use std::collections::HashMap;

use async_trait::async_trait;
use authn_resolver_sdk::{AccountRecord, AccountStore, AuthNResolverError};
use k5_security::IdentityNamespace;

/// Read-only account directory loaded once at startup.
///
/// Lookups are exact and case-sensitive in both namespaces.
#[derive(Debug, Default)]
pub struct StaticAccountStore {
    by_login: HashMap<String, AccountRecord>,
    by_email: HashMap<String, AccountRecord>,
}

impl StaticAccountStore {
    #[must_use]
    pub fn new(accounts: impl IntoIterator<Item = AccountRecord>) -> Self {
        let mut store = Self::default();
        for account in accounts {
            if let Some(email) = &account.email {
                store.by_email.insert(email.clone(), account.clone());
            }
            store.by_login.insert(account.login_id.clone(), account);
        }
        store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_login.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_login.is_empty()
    }
}

#[async_trait]
impl AccountStore for StaticAccountStore {
    async fn find_with_roles(
        &self,
        namespace: IdentityNamespace,
        identifier: &str,
    ) -> Result<Option<AccountRecord>, AuthNResolverError> {
        let index = match namespace {
            IdentityNamespace::LoginId => &self.by_login,
            IdentityNamespace::Email => &self.by_email,
        };
        Ok(index.get(identifier).cloned())
    }
}
