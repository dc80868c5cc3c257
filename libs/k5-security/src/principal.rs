use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::roles::normalize_roles;

/// Which account identifier a token subject (or a resource owner) refers to.
///
/// Accounts are currently addressed by login id. Email addressing is kept as
/// an explicit alternative so the choice lives in configuration, not in code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityNamespace {
    #[default]
    LoginId,
    Email,
}

impl IdentityNamespace {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoginId => "login_id",
            Self::Email => "email",
        }
    }
}

/// Resolved identity of an authenticated caller.
///
/// Built once per request from verified token claims plus an account lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: i64,
    login_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default)]
    roles: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, S>(id: i64, login_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id,
            login_id: login_id.into(),
            email: None,
            roles: normalize_roles(roles),
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Numeric account id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    #[must_use]
    pub fn login_id(&self) -> &str {
        &self.login_id
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Identifier of this principal in the given namespace.
    ///
    /// `None` when the namespace is `Email` and the account has no email.
    #[must_use]
    pub fn identity(&self, namespace: IdentityNamespace) -> Option<&str> {
        match namespace {
            IdentityNamespace::LoginId => Some(self.login_id()),
            IdentityNamespace::Email => self.email(),
        }
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }
}
