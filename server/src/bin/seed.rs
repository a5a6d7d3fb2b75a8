//! Demo-catalog seeding binary.
//!
//! Connects to the configured database, runs migrations, ensures the
//! default admin exists, and inserts the demo trainers/programs/products.

use fitsphere_server::config::Config;
use fitsphere_server::seed;
use fitsphere_server::store::Stores;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .acquire_timeout(Duration::from_secs(config.postgres.connect_timeout))
        .connect(&config.postgres.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let stores = Stores::postgres(pool);
    seed::ensure_default_admin(&stores, &config.auth).await?;
    seed::seed_demo_catalog(&stores).await?;

    tracing::info!("Seeding complete");
    Ok(())
}
