//! `AuthZ` Resolver Module
//!
//! Answers ownership and state-conditioned authorization questions that
//! pure role checks cannot. One [`PolicyEvaluator`] serves one resource type
//! and reads it through a [`ResourceStore`](authz_resolver_sdk::ResourceStore).
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;

pub use config::AuthZResolverConfig;
pub use domain::{DomainError, PolicyEvaluator};
pub use infra::StaticResourceStore;
