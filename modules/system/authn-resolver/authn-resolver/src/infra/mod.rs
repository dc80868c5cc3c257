//! Infrastructure adapters for the `AuthN` resolver.

pub mod static_accounts;

pub use static_accounts::StaticAccountStore;
