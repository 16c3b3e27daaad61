//! Outfit record (code) persistence
//!
//! A code is the finished artifact of one pipeline run: illustration +
//! original references, extracted palette, tags, timing. Palettes and tag
//! lists are JSON text columns.

use sqlx::{Row, SqlitePool};

use corde_common::{Error, Result};

use crate::models::{PaletteCode, PaletteItem};

/// New outfit record to insert
#[derive(Debug, Clone)]
pub struct NewCode {
    pub id: String,
    pub illustration_url: String,
    pub original_url: String,
    pub palette: Vec<PaletteItem>,
    pub style: String,
    pub season_tags: Vec<String>,
    pub scene_tags: Vec<String>,
    pub processing_time_ms: u64,
    pub source: String,
}

/// Stored outfit record
#[derive(Debug, Clone)]
pub struct CodeRecord {
    pub id: String,
    pub illustration_url: String,
    pub original_url: Option<String>,
    pub palette: Vec<PaletteItem>,
    pub style: String,
    pub season_tags: Vec<String>,
    pub scene_tags: Vec<String>,
    pub likes: i64,
}

/// Insert a new outfit record
pub async fn insert_code(pool: &SqlitePool, code: &NewCode) -> Result<()> {
    let palette = serde_json::to_string(&code.palette)
        .map_err(|e| Error::Internal(format!("Failed to serialize palette: {}", e)))?;
    let season_tags = serde_json::to_string(&code.season_tags)
        .map_err(|e| Error::Internal(format!("Failed to serialize season tags: {}", e)))?;
    let scene_tags = serde_json::to_string(&code.scene_tags)
        .map_err(|e| Error::Internal(format!("Failed to serialize scene tags: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO codes (
            id, illustration_url, original_url, palette, style,
            season_tags, scene_tags, processing_time, likes, source,
            status, created_at, processed_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, 'active', ?, ?)
        "#,
    )
    .bind(&code.id)
    .bind(&code.illustration_url)
    .bind(&code.original_url)
    .bind(&palette)
    .bind(&code.style)
    .bind(&season_tags)
    .bind(&scene_tags)
    .bind(code.processing_time_ms as i64)
    .bind(&code.source)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one active outfit record by id
pub async fn get_code(pool: &SqlitePool, code_id: &str) -> Result<Option<CodeRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, illustration_url, original_url, palette, style,
               season_tags, scene_tags, likes
        FROM codes
        WHERE id = ? AND status = 'active'
        "#,
    )
    .bind(code_id)
    .fetch_optional(pool)
    .await?;

    row.map(parse_code_row).transpose()
}

/// Load the palettes of every active outfit, most-liked first
///
/// This is the engine's working set for nearest-color search, popularity
/// co-occurrence and related-outfit lookups.
pub async fn load_active_palettes(pool: &SqlitePool) -> Result<Vec<PaletteCode>> {
    let rows = sqlx::query(
        r#"
        SELECT id, palette, likes
        FROM codes
        WHERE status = 'active'
        ORDER BY likes DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut codes = Vec::with_capacity(rows.len());
    for row in rows {
        let palette: String = row.get("palette");
        let palette: Vec<PaletteItem> = serde_json::from_str(&palette)
            .map_err(|e| Error::Internal(format!("Failed to parse palette: {}", e)))?;
        codes.push(PaletteCode {
            id: row.get("id"),
            likes: row.get("likes"),
            palette,
        });
    }

    Ok(codes)
}

/// Load several outfit records by id, most-liked first
pub async fn get_codes_by_ids(pool: &SqlitePool, ids: &[String]) -> Result<Vec<CodeRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(",");
    let sql = format!(
        r#"
        SELECT id, illustration_url, original_url, palette, style,
               season_tags, scene_tags, likes
        FROM codes
        WHERE id IN ({}) AND status = 'active'
        ORDER BY likes DESC
        LIMIT 20
        "#,
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;
    rows.into_iter().map(parse_code_row).collect()
}

/// Attach classifier categories to an outfit, best-effort per tag
///
/// A proposed category that does not exist in the `categories` table is
/// logged and skipped; tagging never fails the caller.
pub async fn attach_categories(pool: &SqlitePool, code_id: &str, categories: &[String]) {
    for category_id in categories {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO code_categories (code_id, category_id)
            SELECT ?, id FROM categories WHERE id = ?
            "#,
        )
        .bind(code_id)
        .bind(category_id)
        .execute(pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                tracing::warn!(
                    code_id = %code_id,
                    category_id = %category_id,
                    "Category not found, skipping tag"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    code_id = %code_id,
                    category_id = %category_id,
                    error = %e,
                    "Failed to attach category, skipping tag"
                );
            }
        }
    }
}

/// Categories attached to an outfit
pub async fn list_code_categories(pool: &SqlitePool, code_id: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT category_id FROM code_categories WHERE code_id = ? ORDER BY category_id",
    )
    .bind(code_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| row.get("category_id")).collect())
}

fn parse_code_row(row: sqlx::sqlite::SqliteRow) -> Result<CodeRecord> {
    let palette: String = row.get("palette");
    let palette: Vec<PaletteItem> = serde_json::from_str(&palette)
        .map_err(|e| Error::Internal(format!("Failed to parse palette: {}", e)))?;

    let season_tags: String = row.get("season_tags");
    let season_tags: Vec<String> = serde_json::from_str(&season_tags)
        .map_err(|e| Error::Internal(format!("Failed to parse season tags: {}", e)))?;

    let scene_tags: String = row.get("scene_tags");
    let scene_tags: Vec<String> = serde_json::from_str(&scene_tags)
        .map_err(|e| Error::Internal(format!("Failed to parse scene tags: {}", e)))?;

    Ok(CodeRecord {
        id: row.get("id"),
        illustration_url: row.get("illustration_url"),
        original_url: row.get("original_url"),
        palette,
        style: row.get("style"),
        season_tags,
        scene_tags,
        likes: row.get("likes"),
    })
}
