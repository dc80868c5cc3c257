//! Domain layer for the `AuthZ` resolver.

pub mod client;
pub mod error;
pub mod service;

pub use error::DomainError;
pub use service::PolicyEvaluator;
