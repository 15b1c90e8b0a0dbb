//! linkvault API server entry point.
//!
//! Boots the axum REST API: loads layered configuration, opens the SQLite
//! store, builds the metadata extractor from explicit fetch settings, and
//! serves until shutdown. Logging is JSON on stderr.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use linkvault_client::{FetchConfig, MetadataExtractor};
use linkvault_core::{AppConfig, Db};

mod auth;
mod error;
mod routes;

use auth::JwtService;
use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let jwt_secret = config.require_jwt_secret()?.to_string();

    let db = Db::open(&config.db_path).await?;

    let fetch_config = FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        timeout: config.timeout(),
        max_redirects: config.max_redirects,
        accept_invalid_certs: config.accept_invalid_certs,
    };
    let extractor = MetadataExtractor::new(fetch_config)?;

    let state = Arc::new(AppState { db, extractor, jwt: JwtService::new(&jwt_secret) });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Starting linkvault API server");

    axum::serve(listener, app).await?;

    Ok(())
}
