//! Configuration for the `AuthZ` resolver.

use authz_resolver_sdk::ResourceRecord;
use k5_security::IdentityNamespace;
use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthZResolverConfig {
    /// Which principal identifier resource owners are recorded as.
    pub owner_identity: IdentityNamespace,

    /// Seed data for the static article store.
    pub articles: Vec<ResourceRecord>,

    /// Seed data for the static order store.
    pub orders: Vec<ResourceRecord>,
}
