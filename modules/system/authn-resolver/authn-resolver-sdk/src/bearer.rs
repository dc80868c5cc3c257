//! `Authorization: Bearer <token>` header handling.

use crate::error::AuthNResolverError;

/// Exact, case-sensitive prefix of a bearer `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Strip the `Bearer ` prefix and return the trimmed token.
///
/// # Errors
///
/// `MalformedHeader` unless `header` starts with exactly `"Bearer "`
/// (capital `B`, one trailing space).
pub fn strip_prefix(header: &str) -> Result<&str, AuthNResolverError> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(AuthNResolverError::MalformedHeader)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_and_trims() {
        assert_eq!(strip_prefix("Bearer abc").unwrap(), "abc");
        assert_eq!(strip_prefix("Bearer   abc  ").unwrap(), "abc");
    }

    #[test]
    fn rejects_wrong_case_missing_space_and_empty() {
        for header in ["bearer abc", "Bearertoken", "", "Basic abc", "BEARER abc"] {
            assert!(
                matches!(strip_prefix(header), Err(AuthNResolverError::MalformedHeader)),
                "header {header:?} should be rejected"
            );
        }
    }

    #[test]
    fn bare_prefix_yields_empty_token() {
        assert_eq!(strip_prefix("Bearer ").unwrap(), "");
    }
}
