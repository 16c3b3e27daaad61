//! corde-server library interface
//!
//! Exposes the application state, router construction and the component
//! modules for integration testing.

pub mod api;
pub mod classifier;
pub mod color;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Directory of stored original photos
    pub uploads_dir: PathBuf,
    /// Directory of rendered illustrations
    pub processed_dir: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, root_folder: &Path) -> Self {
        Self {
            db,
            uploads_dir: root_folder.join("uploads"),
            processed_dir: root_folder.join("processed"),
            startup_time: Utc::now(),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::upload_routes())
        .merge(api::color_routes())
        .merge(api::health_routes())
        // Stored originals and rendered illustrations are plain static files.
        .nest_service("/uploads", ServeDir::new(state.uploads_dir.clone()))
        .nest_service("/processed", ServeDir::new(state.processed_dir.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
