//! Avatar Upload
//! Mission: Push avatar images to object storage and persist the public URL

use crate::api::{routes::AppState, ApiError};
use crate::auth::{middleware::AuthenticatedUser, models::UserResponse};
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Extension, Json,
};
use tracing::{error, info};

/// Largest accepted avatar image.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

fn file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn content_type_for(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// POST /api/v1/avatar
///
/// Multipart field `avatar`. The image lands in object storage under a
/// per-user key, so a re-upload overwrites the previous one, and the public
/// URL is written to the user record.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<Json<UserResponse>, ApiError> {
    let Some(storage) = state.storage.as_ref() else {
        return Err(ApiError::StorageUnavailable);
    };

    let mut image: Option<(String, &'static str, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("malformed multipart body".to_string()))?
    {
        if field.name() != Some("avatar") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let ext = file_extension(&filename)
            .and_then(|e| content_type_for(&e).map(|ct| (e, ct)))
            .ok_or_else(|| {
                ApiError::Validation("only jpg/jpeg/png/gif/webp images are supported".to_string())
            })?;

        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::Validation("failed to read image data".to_string()))?;

        if data.is_empty() {
            return Err(ApiError::Validation("uploaded image is empty".to_string()));
        }
        if data.len() > MAX_AVATAR_BYTES {
            return Err(ApiError::Validation(
                "image must be 5MB or smaller".to_string(),
            ));
        }

        image = Some((ext.0, ext.1, data));
        break;
    }

    let Some((ext, content_type, data)) = image else {
        return Err(ApiError::Validation(
            "missing multipart field 'avatar'".to_string(),
        ));
    };

    // One object per user; re-uploads overwrite in place.
    let object = format!("user_{}.{}", user.user_id, ext);
    let upload_url = format!(
        "{}/storage/v1/object/{}/{}",
        storage.base_url, storage.bucket, object
    );

    let response = state
        .http_client
        .post(&upload_url)
        .bearer_auth(&storage.service_key)
        .header("apikey", &storage.service_key)
        .header("content-type", content_type)
        .header("x-upsert", "true")
        .body(data)
        .send()
        .await
        .map_err(|e| {
            error!("avatar upload request failed: {}", e);
            ApiError::UploadFailed
        })?;

    if !response.status().is_success() {
        error!("storage rejected avatar upload: {}", response.status());
        return Err(ApiError::UploadFailed);
    }

    let avatar_url = format!(
        "{}/storage/v1/object/public/{}/{}",
        storage.base_url, storage.bucket, object
    );
    let record = state.store.update_avatar(&user.user_id, &avatar_url)?;

    info!("🖼️ Avatar updated for {}", user.user_id);
    Ok(Json(UserResponse::from_user(&record)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_lowercased() {
        assert_eq!(file_extension("Photo.JPG"), Some("jpg".to_string()));
        assert_eq!(file_extension("a.b.webp"), Some("webp".to_string()));
        assert_eq!(file_extension("no-extension"), None);
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for("jpg"), Some("image/jpeg"));
        assert_eq!(content_type_for("jpeg"), Some("image/jpeg"));
        assert_eq!(content_type_for("png"), Some("image/png"));
        assert_eq!(content_type_for("gif"), Some("image/gif"));
        assert_eq!(content_type_for("webp"), Some("image/webp"));
        assert_eq!(content_type_for("svg"), None);
        assert_eq!(content_type_for("exe"), None);
    }
}
