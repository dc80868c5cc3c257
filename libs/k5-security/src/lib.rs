#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Security primitives shared by the authentication and authorization modules.
//!
//! - [`Principal`] - resolved identity of the caller (numeric id, login id, roles)
//! - [`SecurityContext`] - per-request context carrying an optional principal
//! - [`IdentityNamespace`] - which account identifier a subject or owner refers to
//! - [`account_id_of`] - type-erased numeric id extraction
//! - [`roles`] - well-known role names and role-set normalization
pub mod capability;
pub mod context;
pub mod principal;
pub mod roles;

pub use capability::account_id_of;
pub use context::SecurityContext;
pub use principal::{IdentityNamespace, Principal};
