//! Accounts Backend Server
//! Mission: Minimal account service - registration, login, profiles, avatars

use accounts_backend::{
    api::routes::{create_router, AppState},
    auth::{service::AccountService, token::TokenAuthority, user_store::UserStore},
    config::Config,
};
use anyhow::{Context, Result};
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let store = Arc::new(
        UserStore::new(&config.database_path).context("failed to open user database")?,
    );
    info!("✅ User database ready at {}", config.database_path);

    let tokens = Arc::new(TokenAuthority::new(
        config.jwt_secret.clone(),
        config.token_validity_days,
    ));
    let accounts = AccountService::new(store.clone(), tokens.clone());

    if config.storage.is_none() {
        warn!("⚠️ No object storage configured; avatar uploads are disabled");
    }

    let state = AppState {
        accounts,
        store,
        tokens,
        http_client: reqwest::Client::new(),
        storage: config.storage.clone(),
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("🚀 Accounts server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
