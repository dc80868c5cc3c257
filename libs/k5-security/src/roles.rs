//! Well-known roles and role-set normalization.

use std::collections::BTreeSet;

/// Regular user.
pub const USER: &str = "USER";
/// Assistant administrator.
pub const MANAGER: &str = "MANAGER";
/// Top-level administrator.
pub const ADMIN: &str = "ADMIN";

/// Normalize role names into a canonical set.
///
/// Names are trimmed and empty names are dropped. The result is a `BTreeSet`,
/// so duplicates collapse and iteration order is deterministic.
pub fn normalize_roles<I, S>(roles: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    roles
        .into_iter()
        .filter_map(|r| {
            let r = r.as_ref().trim();
            (!r.is_empty()).then(|| r.to_owned())
        })
        .collect()
}
