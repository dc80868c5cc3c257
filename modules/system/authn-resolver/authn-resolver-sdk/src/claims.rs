//! Bearer token payload.
//!
//! Wire shape:
//!
//! ```json
//! {"sub": "alice", "roles": ["ADMIN", "USER"], "iat": 1700000000, "exp": 1700036000}
//! ```
//!
//! Roles are serialized as a sorted JSON array so that the same role set
//! always produces the same payload. On the way back in, the roles claim is
//! accepted as any array (list- or set-encoded, duplicates allowed), a single
//! scalar, `null`, or absent, and is normalized into a set.

use std::collections::BTreeSet;

use k5_security::roles::normalize_roles;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Key of the custom roles claim.
pub const ROLES_CLAIM: &str = "roles";

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    sub: String,
    #[serde(default, deserialize_with = "deserialize_roles")]
    roles: BTreeSet<String>,
    iat: i64,
    exp: i64,
}

impl TokenClaims {
    pub fn new<I, S>(subject: impl Into<String>, roles: I, issued_at: i64, expires_at: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            sub: subject.into(),
            roles: normalize_roles(roles),
            iat: issued_at,
            exp: expires_at,
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Issued-at, epoch seconds.
    #[must_use]
    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    /// Expiration, epoch seconds.
    #[must_use]
    pub fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Normalize a raw roles claim value into a set of role names.
///
/// - absent or `null` -> empty set
/// - array -> its elements; `null` elements are skipped, non-string scalars
///   keep their JSON text
/// - any other value -> a one-element set
#[must_use]
pub fn roles_of_claim(raw: Option<&Value>) -> BTreeSet<String> {
    match raw {
        None | Some(Value::Null) => BTreeSet::new(),
        Some(Value::Array(items)) => normalize_roles(items.iter().filter_map(role_name)),
        Some(other) => normalize_roles(role_name(other)),
    }
}

fn role_name(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn deserialize_roles<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(roles_of_claim(raw.as_ref()))
}
