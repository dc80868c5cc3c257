//! Domain errors for the `AuthN` resolver.

use authn_resolver_sdk::AuthNResolverError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("cannot issue a token for an empty subject")]
    EmptySubject,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired {expired_for_secs}s ago")]
    Expired { expired_for_secs: i64 },

    #[error("account not found: '{0}'")]
    AccountNotFound(String),

    #[error("account store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Storage faults, as opposed to verdicts about the caller's credentials.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Internal(_))
    }
}

impl From<jsonwebtoken::errors::Error> for DomainError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(e.to_string())
    }
}

impl From<AuthNResolverError> for DomainError {
    fn from(e: AuthNResolverError) -> Self {
        match e {
            AuthNResolverError::InvalidSecret(msg) => Self::InvalidSecret(msg),
            AuthNResolverError::MalformedHeader => Self::MalformedHeader,
            AuthNResolverError::InvalidToken(msg) => Self::InvalidToken(msg),
            AuthNResolverError::Expired => Self::Expired {
                expired_for_secs: 0,
            },
            AuthNResolverError::AccountNotFound(subject) => Self::AccountNotFound(subject),
            AuthNResolverError::ServiceUnavailable(msg) => Self::StoreUnavailable(msg),
            AuthNResolverError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for AuthNResolverError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidSecret(msg) => Self::InvalidSecret(msg),
            DomainError::MalformedHeader => Self::MalformedHeader,
            DomainError::InvalidToken(msg) => Self::InvalidToken(msg),
            DomainError::Expired { .. } => Self::Expired,
            DomainError::AccountNotFound(subject) => Self::AccountNotFound(subject),
            DomainError::StoreUnavailable(msg) => Self::ServiceUnavailable(msg),
            DomainError::EmptySubject => Self::Internal(DomainError::EmptySubject.to_string()),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
