//! `AuthN` Resolver Module
//!
//! Issues and verifies HS256 bearer tokens and resolves verified subjects
//! into [`Principal`](k5_security::Principal)s by reading an
//! [`AccountStore`](authn_resolver_sdk::AccountStore).
//!
//! The [`Service`] implements `AuthNResolverClient` and is what the API
//! gateway consumes.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;

pub use config::AuthNResolverConfig;
pub use domain::{ClockSkewPolicy, DomainError, PrincipalResolver, Service, SigningKey, TokenCodec};
pub use infra::StaticAccountStore;
