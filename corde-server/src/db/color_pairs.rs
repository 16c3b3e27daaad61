//! Curated color-compatibility graph access
//!
//! The engine treats `color_pairs` as a static directed weighted graph and
//! only ever reads it.

use sqlx::{Row, SqlitePool};

use corde_common::Result;

use crate::models::CuratedPair;

/// Load the whole compatibility graph
pub async fn load_all(pool: &SqlitePool) -> Result<Vec<CuratedPair>> {
    let rows = sqlx::query("SELECT base_hex, match_hex, score FROM color_pairs")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| CuratedPair {
            base_hex: row.get("base_hex"),
            match_hex: row.get("match_hex"),
            score: row.get("score"),
        })
        .collect())
}
