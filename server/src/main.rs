//! FitSphere API server binary.

use fitsphere_server::auth::TokenService;
use fitsphere_server::cdn::BunnyStorage;
use fitsphere_server::config::Config;
use fitsphere_server::engine::Engine;
use fitsphere_server::gateway::{HttpPaymentGateway, SignatureVerifier};
use fitsphere_server::relay::Relay;
use fitsphere_server::seed;
use fitsphere_server::server::{AppState, build_router};
use fitsphere_server::store::Stores;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .acquire_timeout(Duration::from_secs(config.postgres.connect_timeout))
        .connect(&config.postgres.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let stores = Stores::postgres(pool);
    seed::ensure_default_admin(&stores, &config.auth).await?;

    let gateway = Arc::new(HttpPaymentGateway::new(&config.gateway)?);
    let verifier = SignatureVerifier::new(config.gateway.key_secret.clone());
    let relay = Relay::new();
    let engine = Engine::new(
        stores,
        gateway,
        verifier,
        relay,
        config.gateway.currency.clone(),
        config.gateway.key_id.clone(),
    );

    let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
    let storage = Arc::new(BunnyStorage::new(&config.cdn)?);

    let state = AppState::new(engine, tokens, storage);
    let router = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "FitSphere API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install shutdown handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
