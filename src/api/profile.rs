//! Profile Endpoints
//! Mission: Read and update the authenticated user's record

use crate::api::{routes::AppState, ApiError};
use crate::auth::{middleware::AuthenticatedUser, models::UserResponse};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use validator::Validate;

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let record = state
        .store
        .find_by_id(&user.user_id)?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(UserResponse::from_user(&record)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 20))]
    pub nickname: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// PUT /api/v1/profile
///
/// Applies only the fields present in the body; an empty update is rejected.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate()?;

    if payload.nickname.is_none() && payload.avatar_url.is_none() {
        return Err(ApiError::Validation("no fields to update".to_string()));
    }

    let record = state.store.update_profile(
        &user.user_id,
        payload.nickname.as_deref(),
        payload.avatar_url.as_deref(),
    )?;

    Ok(Json(UserResponse::from_user(&record)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
}

/// PUT /api/v1/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    payload.validate()?;

    state
        .accounts
        .change_password(user.user_id, &payload.old_password, &payload.new_password)?;

    Ok(StatusCode::NO_CONTENT)
}
