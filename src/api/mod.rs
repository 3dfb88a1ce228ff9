//! HTTP API
//! Mission: Map the account core onto transport

pub mod account;
pub mod profile;
pub mod routes;
pub mod upload;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::service::{AuthError, PasswordChangeError, RegistrationError};
use crate::auth::user_store::StoreError;

/// Transport-level error shared by every API handler. Core taxonomy values
/// map onto status codes here; internals stay server-side.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    EmailTaken,
    InvalidCredentials,
    WrongOldPassword,
    SamePassword,
    NotFound(&'static str),
    StorageUnavailable,
    UploadFailed,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::EmailTaken => (StatusCode::CONFLICT, "email already registered".to_string()),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid email or password".to_string(),
            ),
            ApiError::WrongOldPassword => {
                (StatusCode::BAD_REQUEST, "old password is incorrect".to_string())
            }
            ApiError::SamePassword => (
                StatusCode::BAD_REQUEST,
                "new password must differ from the old one".to_string(),
            ),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            ApiError::StorageUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "image storage is not configured".to_string(),
            ),
            ApiError::UploadFailed => (
                StatusCode::BAD_GATEWAY,
                "failed to upload image".to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::EmailTaken => ApiError::EmailTaken,
            other => {
                tracing::error!("registration failed: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            other => {
                tracing::error!("login failed: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<PasswordChangeError> for ApiError {
    fn from(err: PasswordChangeError) -> Self {
        match err {
            PasswordChangeError::InvalidCredentials => ApiError::WrongOldPassword,
            PasswordChangeError::SamePassword => ApiError::SamePassword,
            PasswordChangeError::Store(StoreError::NotFound) => ApiError::NotFound("user"),
            other => {
                tracing::error!("password change failed: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("user"),
            StoreError::Conflict => ApiError::EmailTaken,
            StoreError::Database(e) => {
                tracing::error!("database error: {}", e);
                ApiError::Internal
            }
        }
    }
}
