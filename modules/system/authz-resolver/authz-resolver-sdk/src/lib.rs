#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` Resolver SDK
//!
//! This crate provides the public contract of the `authz_resolver` module:
//!
//! - [`AuthZResolverClient`] - Ownership and state predicates for handlers
//! - [`ResourceStore`] - Read-only resource lookup the predicates rely on
//! - [`ResourceRecord`] - Owner and state of a stored resource
//! - [`AuthZResolverError`] - Error types
//!
//! ## Usage
//!
//! Predicates answer `Ok(false)` for "not allowed"; callers combine them with
//! role checks at the call site:
//!
//! ```ignore
//! use authz_resolver_sdk::AuthZResolverClient;
//! use k5_security::roles::ADMIN;
//!
//! let can_delete = ctx.has_role(ADMIN) || articles.is_resource_owner(&ctx, Some(id)).await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod store_api;

// Re-export main types at crate root
pub use api::AuthZResolverClient;
pub use error::AuthZResolverError;
pub use models::ResourceRecord;
pub use store_api::ResourceStore;
