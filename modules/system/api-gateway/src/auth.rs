use std::collections::HashMap;
use std::sync::Arc;

use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError};
use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::{HeaderMap, Method, StatusCode, header};
use k5_security::SecurityContext;

use crate::config::ApiGatewayConfig;
use crate::problem::Problem;

/// Matcher for public route patterns.
#[derive(Clone)]
pub struct PublicRouteMatcher {
    matcher: matchit::Router<()>,
}

impl PublicRouteMatcher {
    fn new() -> Self {
        Self {
            matcher: matchit::Router::new(),
        }
    }

    fn insert(&mut self, path: &str) -> Result<(), matchit::InsertError> {
        self.matcher.insert(path, ())
    }

    fn find(&self, path: &str) -> bool {
        self.matcher.at(path).is_ok()
    }
}

/// Whether a route requires authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequirement {
    /// No authentication required (public route).
    None,
    /// Authentication required.
    Required,
}

/// Gateway-specific route policy implementation
#[derive(Clone)]
pub struct GatewayRoutePolicy {
    public_matchers: Arc<HashMap<Method, PublicRouteMatcher>>,
    public_any_method: Option<Arc<PublicRouteMatcher>>,
    require_auth_by_default: bool,
}

impl GatewayRoutePolicy {
    /// Resolve the authentication requirement for a given (method, path).
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> AuthRequirement {
        let is_public = self
            .public_matchers
            .get(method)
            .is_some_and(|matcher| matcher.find(path))
            || self
                .public_any_method
                .as_deref()
                .is_some_and(|matcher| matcher.find(path));

        if self.require_auth_by_default && !is_public {
            AuthRequirement::Required
        } else {
            AuthRequirement::None
        }
    }
}

/// Shared state for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub authn_client: Arc<dyn AuthNResolverClient>,
    pub route_policy: GatewayRoutePolicy,
}

/// Build `GatewayRoutePolicy` from the configured public routes.
///
/// Each entry is `"METHOD /path"` or just `"/path"` (any method); paths use
/// matchit `{param}` syntax, the same as axum 0.8 routes.
///
/// # Errors
///
/// Fails on an unknown HTTP method or a pattern matchit rejects, e.g. a
/// duplicate or conflicting route.
pub fn build_route_policy(cfg: &ApiGatewayConfig) -> Result<GatewayRoutePolicy, anyhow::Error> {
    let mut public_matchers_map: HashMap<Method, PublicRouteMatcher> = HashMap::new();
    let mut any_method: Option<PublicRouteMatcher> = None;

    for route in &cfg.public_routes {
        let route = route.trim();
        let (method, path) = match route.split_once(char::is_whitespace) {
            Some((method, path)) => {
                let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                    .map_err(|e| anyhow::anyhow!("Invalid method in public route '{route}': {e}"))?;
                (Some(method), path.trim())
            }
            None => (None, route),
        };

        let matcher = match method {
            Some(method) => public_matchers_map
                .entry(method)
                .or_insert_with(PublicRouteMatcher::new),
            None => any_method.get_or_insert_with(PublicRouteMatcher::new),
        };
        matcher
            .insert(path)
            .map_err(|e| anyhow::anyhow!("Failed to insert public route pattern '{route}': {e}"))?;
    }

    Ok(GatewayRoutePolicy {
        public_matchers: Arc::new(public_matchers_map),
        public_any_method: any_method.map(Arc::new),
        require_auth_by_default: cfg.require_auth_by_default,
    })
}

/// Authentication middleware that uses the `AuthN` Resolver to validate bearer tokens.
///
/// For each request:
/// 1. Skips CORS preflight requests
/// 2. Resolves the route's auth requirement via `GatewayRoutePolicy`
/// 3. For public routes: inserts anonymous `SecurityContext`
/// 4. For required routes: passes the `Authorization` header to the `AuthN`
///    Resolver and inserts the resulting `SecurityContext`
pub async fn authn_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    match state.route_policy.resolve(req.method(), req.uri().path()) {
        AuthRequirement::None => {
            req.extensions_mut().insert(SecurityContext::anonymous());
            next.run(req).await
        }
        AuthRequirement::Required => {
            let Some(header_value) = authorization_header(req.headers()) else {
                tracing::debug!(path = %req.uri().path(), "request without usable Authorization header");
                return Problem::new(
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized",
                    "Missing or unreadable Authorization header",
                )
                .with_code("malformed_header")
                .into_response();
            };

            match state.authn_client.authenticate(header_value).await {
                Ok(result) => {
                    req.extensions_mut().insert(result.security_context);
                    next.run(req).await
                }
                Err(err) => authn_error_to_response(&err),
            }
        }
    }
}

/// Convert `AuthNResolverError` to an RFC-9457 Problem Details response.
fn authn_error_to_response(err: &AuthNResolverError) -> Response {
    log_authn_error(err);
    let (status, title, detail, code) = match err {
        AuthNResolverError::MalformedHeader => (
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Authorization header must use the Bearer scheme",
            Some("malformed_header"),
        ),
        AuthNResolverError::InvalidToken(_) => (
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Bearer token is invalid",
            Some("invalid_token"),
        ),
        AuthNResolverError::Expired => (
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Bearer token has expired",
            Some("token_expired"),
        ),
        AuthNResolverError::AccountNotFound(_) => (
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Account not found",
            Some("account_not_found"),
        ),
        AuthNResolverError::ServiceUnavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable",
            "Authentication service unavailable",
            None,
        ),
        AuthNResolverError::InvalidSecret(_) | AuthNResolverError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "Internal authentication error",
            None,
        ),
    };
    let mut problem = Problem::new(status, title, detail);
    if let Some(code) = code {
        problem = problem.with_code(code);
    }
    problem.into_response()
}

/// Log authentication errors at appropriate levels.
///
/// Cognitive complexity is inflated by tracing macro expansion.
#[allow(clippy::cognitive_complexity)]
fn log_authn_error(err: &AuthNResolverError) {
    match err {
        AuthNResolverError::MalformedHeader
        | AuthNResolverError::InvalidToken(_)
        | AuthNResolverError::Expired
        | AuthNResolverError::AccountNotFound(_) => tracing::debug!("AuthN rejected: {err}"),
        AuthNResolverError::ServiceUnavailable(msg) => {
            tracing::error!("AuthN service unavailable: {msg}");
        }
        AuthNResolverError::InvalidSecret(msg) | AuthNResolverError::Internal(msg) => {
            tracing::error!("AuthN internal error: {msg}");
        }
    }
}

/// Raw `Authorization` header value, if present and valid UTF-8.
fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Check if this is a CORS preflight request
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Extractor for `SecurityContext` - validates that auth middleware has run
#[derive(Debug, Clone)]
pub struct Authz(pub SecurityContext);

impl<S> FromRequestParts<S> for Authz
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(Authz)
            .ok_or_else(|| {
                tracing::error!("SecurityContext not found - auth middleware not configured");
                Problem::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Security context unavailable",
                )
            })
    }
}
