//! Router Assembly
//! Mission: Wire public and protected routes around the auth gate

use crate::api::{account, profile, upload};
use crate::auth::{
    middleware::require_auth, service::AccountService, token::TokenAuthority, user_store::UserStore,
};
use crate::config::StorageConfig;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub store: Arc<UserStore>,
    pub tokens: Arc<TokenAuthority>,
    pub http_client: reqwest::Client,
    pub storage: Option<StorageConfig>,
}

/// Create the API router. The auth gate wraps every protected route; public
/// routes never touch it.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/v1/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/v1/password", put(profile::change_password))
        .route(
            "/api/v1/avatar",
            post(upload::upload_avatar)
                // Multipart framing overhead on top of the image itself.
                .layer(DefaultBodyLimit::max(upload::MAX_AVATAR_BYTES + 64 * 1024)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/register", post(account::register))
        .route("/api/v1/login", post(account::login))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
