#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthN` Resolver SDK
//!
//! This crate provides the public contract of the `authn_resolver` module:
//!
//! - [`AuthNResolverClient`] - Public API trait for consumers (the gateway)
//! - [`AccountStore`] - Account storage contract the resolver reads from
//! - [`TokenClaims`] - Bearer token payload and its role-claim normalization
//! - [`AuthenticationResult`], [`AccountRecord`], [`IssuedToken`] - Models
//! - [`AuthNResolverError`] - Error taxonomy
//!
//! ## Usage
//!
//! ```ignore
//! use authn_resolver_sdk::AuthNResolverClient;
//!
//! // Authenticate the raw `Authorization` header value
//! let result = authn.authenticate("Bearer eyJhbGciOi...").await?;
//! let security_context = result.security_context;
//! ```

pub mod api;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod models;
pub mod store_api;

// Re-export main types at crate root
pub use api::AuthNResolverClient;
pub use bearer::{BEARER_PREFIX, strip_prefix};
pub use claims::{ROLES_CLAIM, TokenClaims, roles_of_claim};
pub use error::AuthNResolverError;
pub use models::{AccountRecord, AuthenticationResult, IssuedToken};
pub use store_api::AccountStore;
