//! corde-server - Outfit Illustration & Color Intelligence Service
//!
//! Accepts outfit photo uploads, converts them asynchronously into
//! stylized illustrations with extracted color palettes, and answers
//! color search/recommendation/explanation queries over the stored
//! outfits.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use corde_server::config::ServerConfig;
use corde_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting corde-server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve configuration and root folder
    let config = ServerConfig::load();
    info!("Root folder: {}", config.root_folder.display());

    // Step 2: Create root folder and data directories if missing
    corde_common::config::ensure_root_folder(&config.root_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;

    // Step 3: Open or create the database
    let db_path = corde_common::config::database_path(&config.root_folder);
    info!("Database: {}", db_path.display());

    let db_pool = corde_server::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Step 4: Startup hygiene. Jobs left processing by a previous run have
    // no continuation anymore and can never complete.
    let stale = corde_server::db::jobs::fail_stale_jobs(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("Stale job cleanup failed: {}", e))?;
    if stale > 0 {
        info!(stale_jobs = stale, "Marked stale processing jobs as failed");
    }

    // Create application state and router
    let state = AppState::new(db_pool, &config.root_folder);
    let app = corde_server::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("Listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
