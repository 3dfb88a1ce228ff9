//! Authentication Middleware
//! Mission: Gate protected routes behind token validation

use crate::auth::token::TokenAuthority;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// The authenticated identity attached to a request once the gate admits it.
/// Lives for exactly one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Auth gate that validates bearer tokens.
///
/// Runs before any protected-route logic and fails closed: a missing header,
/// a malformed header or any validation failure rejects the request before
/// protected state is touched.
pub async fn require_auth(
    State(tokens): State<Arc<TokenAuthority>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Unauthorized> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(Unauthorized)?;

    let user_id = tokens.validate(token).map_err(|e| {
        // The variant stays server-side; callers only ever see a generic 401.
        tracing::debug!("rejected bearer token: {}", e);
        Unauthorized
    })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

/// Uniform rejection for the auth gate. Every failure mode collapses to the
/// same response so validation internals never leak.
#[derive(Debug)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "authentication required" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.user_id.to_string()
    }

    fn protected_router(tokens: Arc<TokenAuthority>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(tokens, require_auth))
    }

    fn authority() -> Arc<TokenAuthority> {
        Arc::new(TokenAuthority::new("gate-test-secret".to_string(), 7))
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let app = protected_router(authority());

        let response = app
            .oneshot(HttpRequest::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_scheme_rejected() {
        let app = protected_router(authority());

        let response = app
            .oneshot(
                HttpRequest::get("/whoami")
                    .header(header::AUTHORIZATION, "Token abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let app = protected_router(authority());

        let response = app
            .oneshot(
                HttpRequest::get("/whoami")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_admits_and_attaches_principal() {
        let tokens = authority();
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();
        let app = protected_router(tokens);

        let response = app
            .oneshot(
                HttpRequest::get("/whoami")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        // Zero-day validity makes every token instantly expired.
        let tokens = Arc::new(TokenAuthority::new("gate-test-secret".to_string(), 0));
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        let app = protected_router(tokens);

        let response = app
            .oneshot(
                HttpRequest::get("/whoami")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
