//! API gateway: bearer authentication in front of axum routes.
//!
//! [`auth::authn_middleware`] authenticates requests through an
//! [`AuthNResolverClient`](authn_resolver_sdk::AuthNResolverClient) and
//! attaches a [`SecurityContext`](k5_security::SecurityContext); handlers
//! read it back with the [`Authz`] extractor.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod auth;
pub mod config;
pub mod problem;

pub use auth::{AuthState, Authz, GatewayRoutePolicy, authn_middleware, build_route_policy};
pub use config::ApiGatewayConfig;
pub use problem::Problem;

use std::sync::Arc;

use authn_resolver_sdk::AuthNResolverClient;
use axum::Router;

/// Put `router` behind the authentication middleware.
///
/// # Errors
///
/// Fails if the configured public routes cannot be compiled.
pub fn with_authentication(
    router: Router,
    cfg: &ApiGatewayConfig,
    authn_client: Arc<dyn AuthNResolverClient>,
) -> anyhow::Result<Router> {
    let state = AuthState {
        authn_client,
        route_policy: build_route_policy(cfg)?,
    };
    Ok(router.layer(axum::middleware::from_fn_with_state(
        state,
        authn_middleware,
    )))
}
