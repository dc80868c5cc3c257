//! Domain errors for the `AuthZ` resolver.

use authz_resolver_sdk::AuthZResolverError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("{resource_type} store unavailable: {reason}")]
    StoreUnavailable {
        resource_type: String,
        reason: String,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub(crate) fn from_store(resource_type: &str, e: AuthZResolverError) -> Self {
        match e {
            AuthZResolverError::ServiceUnavailable(reason) => Self::StoreUnavailable {
                resource_type: resource_type.to_owned(),
                reason,
            },
            AuthZResolverError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for AuthZResolverError {
    fn from(e: DomainError) -> Self {
        match e {
            e @ DomainError::StoreUnavailable { .. } => Self::ServiceUnavailable(e.to_string()),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
