//! Infrastructure adapters for the `AuthZ` resolver.

pub mod static_resources;

pub use static_resources::StaticResourceStore;
