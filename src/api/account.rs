//! Registration & Login Endpoints
//! Mission: Public entry points that mint identity tokens

use crate::api::{routes::AppState, ApiError};
use crate::auth::models::UserResponse;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub nickname: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_in: i64, // seconds until the token expires
    pub user: UserResponse,
}

/// POST /api/v1/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    let (token, user) =
        state
            .accounts
            .register(&payload.email, &payload.password, &payload.nickname)?;

    Ok(Json(AuthResponse {
        token,
        expires_in: state.tokens.validity_secs(),
        user: UserResponse::from_user(&user),
    }))
}

/// POST /api/v1/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    let (token, user) = state.accounts.login(&payload.email, &payload.password)?;

    Ok(Json(AuthResponse {
        token,
        expires_in: state.tokens.validity_secs(),
        user: UserResponse::from_user(&user),
    }))
}
