//! Domain layer for the `AuthN` resolver.

pub mod client;
pub mod error;
pub mod principal_resolver;
pub mod service;
pub mod token_codec;

pub use error::DomainError;
pub use principal_resolver::PrincipalResolver;
pub use service::Service;
pub use token_codec::{ClockSkewPolicy, SigningKey, TokenCodec};
