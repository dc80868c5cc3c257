//! HTTP surface: health, caller identity and permission introspection.
//!
//! Each permission answer combines a role check with a policy predicate at
//! the call site, e.g. `ADMIN or isResourceOwner`.

use std::sync::Arc;

use api_gateway::{ApiGatewayConfig, Authz, Problem};
use authn_resolver::Service as AuthNService;
use authz_resolver_sdk::{AuthZResolverClient, AuthZResolverError};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use k5_security::roles::{ADMIN, MANAGER};
use secrecy::ExposeSecret;
use serde_json::{Value, json};

/// Order state in which the owner may still cancel.
pub const CANCELLABLE_STATE: &str = "PENDING";

/// Public routes the server always exposes.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &["GET /health"];

#[derive(Clone)]
pub struct AppState {
    pub authn: Arc<AuthNService>,
    pub articles: Arc<dyn AuthZResolverClient>,
    pub orders: Arc<dyn AuthZResolverClient>,
}

/// Build the full router, authentication included.
///
/// # Errors
///
/// Fails if the gateway's public routes cannot be compiled.
pub fn router(state: AppState, gateway: &ApiGatewayConfig) -> anyhow::Result<Router> {
    let mut gateway = gateway.clone();
    for route in DEFAULT_PUBLIC_ROUTES {
        if !gateway.public_routes.iter().any(|r| r == route) {
            gateway.public_routes.push((*route).to_owned());
        }
    }

    let authn = state.authn.clone();
    let routes = Router::new()
        .route("/health", get(health))
        .route("/api/v1/me", get(me))
        .route("/api/v1/articles/{id}/permissions", get(article_permissions))
        .route("/api/v1/orders/{id}/permissions", get(order_permissions))
        .route(
            "/api/v1/users/{id}/orders/permissions",
            get(user_order_permissions),
        )
        .with_state(state);

    api_gateway::with_authentication(routes, &gateway, authn)
}

/// `AuthZResolverError` rendered as a problem response.
struct ApiError(AuthZResolverError);

impl From<AuthZResolverError> for ApiError {
    fn from(e: AuthZResolverError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "authorization check failed");
        let problem = match self.0 {
            AuthZResolverError::ServiceUnavailable(_) => Problem::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable",
                "Authorization data is temporarily unavailable",
            ),
            AuthZResolverError::Internal(_) => Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "Internal authorization error",
            ),
        };
        problem.into_response()
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn me(State(state): State<AppState>, Authz(ctx): Authz) -> Response {
    let Some(principal) = ctx.principal() else {
        return Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "Authentication required")
            .into_response();
    };

    let expires_in = ctx
        .bearer_token()
        .and_then(|token| state.authn.remaining_lifetime(token.expose_secret()).ok())
        .map(|remaining| remaining.whole_seconds());

    Json(json!({
        "id": principal.id(),
        "login_id": principal.login_id(),
        "email": principal.email(),
        "roles": principal.roles(),
        "token_expires_in": expires_in,
    }))
    .into_response()
}

async fn article_permissions(
    State(state): State<AppState>,
    Authz(ctx): Authz,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let is_owner = state.articles.is_resource_owner(&ctx, Some(id)).await?;
    Ok(Json(json!({
        "article_id": id,
        "can_update": ctx.has_any_role(&[ADMIN, MANAGER]) || is_owner,
        "can_delete": ctx.has_role(ADMIN) || is_owner,
    })))
}

async fn order_permissions(
    State(state): State<AppState>,
    Authz(ctx): Authz,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let can_cancel = ctx.has_role(ADMIN)
        || state
            .orders
            .can_transition(&ctx, Some(id), CANCELLABLE_STATE)
            .await?;
    Ok(Json(json!({"order_id": id, "can_cancel": can_cancel})))
}

async fn user_order_permissions(
    State(state): State<AppState>,
    Authz(ctx): Authz,
    Path(id): Path<i64>,
) -> Json<Value> {
    let can_view = ctx.has_role(ADMIN) || state.orders.is_self(Some(id), &ctx);
    Json(json!({"user_id": id, "can_view": can_view}))
}
