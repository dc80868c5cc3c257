//! Configuration for the `AuthN` resolver.

use std::time::Duration;

use authn_resolver_sdk::AccountRecord;
use k5_security::IdentityNamespace;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Default token lifetime: 10 hours.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_hours(10);

/// Configuration.
///
/// ```yaml
/// authn:
///   secret: "c2VjcmV0LXNlY3JldC1zZWNyZXQtc2VjcmV0LXNlY3JldA=="
///   token_ttl: 10h
///   clock_skew: 5s
///   identity: login_id
///   accounts:
///     - { id: 1, login_id: alice, roles: [USER, ADMIN] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthNResolverConfig {
    /// Base64-encoded HMAC secret, at least 32 bytes once decoded.
    pub secret: SecretString,

    /// Lifetime of issued tokens. Humantime string (`"10h"`) or seconds.
    #[serde(default = "default_token_ttl", deserialize_with = "deserialize_duration")]
    pub token_ttl: Duration,

    /// Grace window for just-expired tokens. Zero disables it.
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub clock_skew: Duration,

    /// Which account identifier token subjects refer to.
    #[serde(default)]
    pub identity: IdentityNamespace,

    /// Accounts served by the built-in static store.
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

impl AuthNResolverConfig {
    /// Minimal config with defaults for everything but the secret.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            token_ttl: DEFAULT_TOKEN_TTL,
            clock_skew: Duration::ZERO,
            identity: IdentityNamespace::default(),
            accounts: Vec::new(),
        }
    }
}

fn default_token_ttl() -> Duration {
    DEFAULT_TOKEN_TTL
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Secs(u64),
    Human(String),
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match RawDuration::deserialize(deserializer)? {
        RawDuration::Secs(secs) => Ok(Duration::from_secs(secs)),
        RawDuration::Human(s) => humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom),
    }
}
