#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for auth middleware
//!
//! These tests verify that:
//! 1. `SecurityContext` is always inserted by middleware
//! 2. Public routes work without authentication
//! 3. Protected routes translate every authentication failure into the
//!    matching problem response

use std::sync::Arc;

use api_gateway::{ApiGatewayConfig, Authz, with_authentication};
use async_trait::async_trait;
use authn_resolver_sdk::{
    AuthNResolverClient, AuthNResolverError, AuthenticationResult, IssuedToken, TokenClaims,
};
use axum::body::{Body, to_bytes};
use axum::routing::get;
use axum::{Json, Router};
use http::{Method, Request, StatusCode, header};
use k5_security::{Principal, SecurityContext};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Accepts `Bearer good`; every other token maps to a fixed failure.
struct FakeAuthN;

#[async_trait]
impl AuthNResolverClient for FakeAuthN {
    async fn authenticate(
        &self,
        authorization_header: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        let token = authn_resolver_sdk::strip_prefix(authorization_header)?;
        match token {
            "good" => Ok(AuthenticationResult {
                security_context: SecurityContext::builder()
                    .principal(Principal::new(7, "alice", ["USER"]))
                    .bearer_token(token.to_owned())
                    .build(),
                claims: TokenClaims::new("alice", ["USER"], 0, 60),
            }),
            "expired" => Err(AuthNResolverError::Expired),
            "orphan" => Err(AuthNResolverError::AccountNotFound("ghost".to_owned())),
            "down" => Err(AuthNResolverError::ServiceUnavailable("db".to_owned())),
            "boom" => Err(AuthNResolverError::Internal("boom".to_owned())),
            _ => Err(AuthNResolverError::InvalidToken("bad signature".to_owned())),
        }
    }

    async fn issue_for_account(&self, _identifier: &str) -> Result<IssuedToken, AuthNResolverError> {
        Err(AuthNResolverError::Internal("not used".to_owned()))
    }
}

async fn whoami(Authz(ctx): Authz) -> Json<Value> {
    Json(json!({
        "authenticated": ctx.is_authenticated(),
        "id": ctx.principal().map(Principal::id),
    }))
}

fn app() -> Router {
    let cfg = ApiGatewayConfig {
        public_routes: vec!["GET /health".to_owned()],
        ..ApiGatewayConfig::default()
    };
    let router = Router::new()
        .route("/health", get(whoami))
        .route("/me", get(whoami).options(|| async { StatusCode::NO_CONTENT }));
    with_authentication(router, &cfg, Arc::new(FakeAuthN)).unwrap()
}

async fn call(req: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let resp = app().oneshot(req).await.unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, content_type, body)
}

fn get_with_auth(path: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn public_route_gets_anonymous_context() {
    let (status, _, body) = call(get_with_auth("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"authenticated": false, "id": null}));
}

#[tokio::test]
async fn valid_token_attaches_principal() {
    let (status, _, body) = call(get_with_auth("/me", Some("Bearer good"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"authenticated": true, "id": 7}));
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let (status, content_type, body) = call(get_with_auth("/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(content_type.as_deref(), Some("application/problem+json"));
    assert_eq!(body["code"], "malformed_header");
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn failures_map_to_problem_codes() {
    let cases = [
        ("Basic abc", StatusCode::UNAUTHORIZED, json!("malformed_header")),
        ("Bearer forged", StatusCode::UNAUTHORIZED, json!("invalid_token")),
        ("Bearer expired", StatusCode::UNAUTHORIZED, json!("token_expired")),
        ("Bearer orphan", StatusCode::UNAUTHORIZED, json!("account_not_found")),
        ("Bearer down", StatusCode::SERVICE_UNAVAILABLE, Value::Null),
        ("Bearer boom", StatusCode::INTERNAL_SERVER_ERROR, Value::Null),
    ];

    for (authorization, expected_status, expected_code) in cases {
        let (status, content_type, body) = call(get_with_auth("/me", Some(authorization))).await;
        assert_eq!(status, expected_status, "{authorization}");
        assert_eq!(content_type.as_deref(), Some("application/problem+json"));
        assert_eq!(body["code"], expected_code, "{authorization}");
    }
}

#[tokio::test]
async fn unavailable_detail_is_not_exposed() {
    let (_, _, body) = call(get_with_auth("/me", Some("Bearer down"))).await;
    assert!(!body.to_string().contains("db"));
}

#[tokio::test]
async fn cors_preflight_skips_authentication() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/me")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = call(req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn extractor_without_middleware_is_internal_error() {
    let router: Router = Router::new().route("/me", get(whoami));
    let resp = router.oneshot(get_with_auth("/me", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
