//! Database access for corde-server
//!
//! One SQLite database in the root folder holds outfit records (`codes`),
//! processing jobs, the curated color-compatibility graph and the garment
//! categories. Tables are created on startup; the compatibility graph and
//! category list are seeded on first run.

pub mod codes;
pub mod color_pairs;
pub mod jobs;
mod seed;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!("Connecting to database: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    init_tables(&pool).await?;
    seed::apply(&pool).await?;

    Ok(pool)
}

/// Create the corde tables if they don't exist
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // Outfit records: one per successful pipeline run.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS codes (
            id TEXT PRIMARY KEY,
            illustration_url TEXT NOT NULL,
            original_url TEXT,
            palette TEXT NOT NULL,
            style TEXT NOT NULL DEFAULT 'standard',
            season_tags TEXT NOT NULL DEFAULT '[]',
            scene_tags TEXT NOT NULL DEFAULT '[]',
            processing_time INTEGER,
            likes INTEGER NOT NULL DEFAULT 0,
            source TEXT NOT NULL DEFAULT 'user_upload',
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            processed_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Processing jobs: one per upload or re-style request.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS processing_jobs (
            id TEXT PRIMARY KEY,
            code_id TEXT,
            status TEXT NOT NULL,
            current_step TEXT NOT NULL DEFAULT '',
            progress INTEGER NOT NULL DEFAULT 0,
            style TEXT NOT NULL,
            error_message TEXT,
            started_at TEXT NOT NULL,
            completed_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Curated color-compatibility graph; read-only to the engine.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS color_pairs (
            base_hex TEXT NOT NULL,
            match_hex TEXT NOT NULL,
            score REAL NOT NULL,
            PRIMARY KEY (base_hex, match_hex)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Garment categories and the outfit↔category link table.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS code_categories (
            code_id TEXT NOT NULL REFERENCES codes(id),
            category_id TEXT NOT NULL REFERENCES categories(id),
            PRIMARY KEY (code_id, category_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!(
        "Database tables initialized (codes, processing_jobs, color_pairs, categories)"
    );

    Ok(())
}
