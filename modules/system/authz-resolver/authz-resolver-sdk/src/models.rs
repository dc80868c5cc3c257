//! Domain models for the `AuthZ` resolver module.

use serde::{Deserialize, Serialize};

/// Ownership and lifecycle state of a stored resource.
///
/// `owner` is an account identifier in the namespace the resolver is
/// configured with (login id by default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceRecord {
    pub id: i64,
    pub owner: String,
    /// Current status, e.g. `"PENDING"`. Resources without a lifecycle have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl ResourceRecord {
    #[must_use]
    pub fn new(id: i64, owner: impl Into<String>) -> Self {
        Self {
            id,
            owner: owner.into(),
            state: None,
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Exact, case-sensitive state comparison.
    #[must_use]
    pub fn is_in_state(&self, state: &str) -> bool {
        self.state.as_deref() == Some(state)
    }
}
