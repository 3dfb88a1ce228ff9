//! Configuration
//! Mission: Load process-wide settings once at startup

use crate::auth::token::DEFAULT_VALIDITY_DAYS;
use std::env;

/// Process-wide configuration, read from the environment once at startup and
/// immutable afterwards. Components receive these values explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub token_validity_days: i64,
    pub storage: Option<StorageConfig>,
}

/// Object storage endpoint for avatar uploads. Absent when the deployment
/// does not configure one; the upload route then reports the feature as
/// unavailable instead of failing at startup.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_url: String,
    pub service_key: String,
    pub bucket: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "accounts.db".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-in-production".to_string());

        let token_validity_days = env::var("TOKEN_VALIDITY_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_VALIDITY_DAYS);

        let storage = match (env::var("STORAGE_URL"), env::var("STORAGE_SERVICE_KEY")) {
            (Ok(base_url), Ok(service_key))
                if !base_url.trim().is_empty() && !service_key.trim().is_empty() =>
            {
                Some(StorageConfig {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    service_key,
                    bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "avatars".to_string()),
                })
            }
            _ => None,
        };

        Self {
            port,
            database_path,
            jwt_secret,
            token_validity_days,
            storage,
        }
    }
}
