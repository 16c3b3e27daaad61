//! First-run seed data
//!
//! The compatibility graph is hand-authored: classic fashion pairings
//! between the staple colors, weighted by how reliably they work. Scores
//! are relative, non-negative, higher = stronger recommendation.

use anyhow::Result;
use sqlx::SqlitePool;

/// Garment-slot categories the classifier may propose
const CATEGORIES: &[(&str, &str)] = &[
    ("tops", "Tops"),
    ("bottoms", "Bottoms"),
    ("outer", "Outerwear"),
    ("shoes", "Shoes"),
    ("accessories", "Accessories"),
];

/// Curated (base, match, score) edges
const COLOR_PAIRS: &[(&str, &str, f64)] = &[
    // Black pairs with almost everything.
    ("#000000", "#FFFFFF", 0.95),
    ("#000000", "#808080", 0.85),
    ("#000000", "#F5F5DC", 0.80),
    ("#000000", "#E74C3C", 0.75),
    ("#000000", "#D4A574", 0.70),
    // White
    ("#FFFFFF", "#000000", 0.95),
    ("#FFFFFF", "#1A1A2E", 0.90),
    ("#FFFFFF", "#4169E1", 0.80),
    ("#FFFFFF", "#FFC0CB", 0.70),
    // Navy
    ("#1A1A2E", "#FFFFFF", 0.90),
    ("#1A1A2E", "#F5F5DC", 0.85),
    ("#1A1A2E", "#D4A574", 0.80),
    ("#1A1A2E", "#FFC0CB", 0.65),
    // Beige
    ("#F5F5DC", "#8B4513", 0.85),
    ("#F5F5DC", "#1A1A2E", 0.85),
    ("#F5F5DC", "#FFFFFF", 0.80),
    ("#F5F5DC", "#556B2F", 0.70),
    // Camel
    ("#D4A574", "#1A1A2E", 0.85),
    ("#D4A574", "#FFFFFF", 0.80),
    ("#D4A574", "#722F37", 0.70),
    // Brown
    ("#8B4513", "#F5F5DC", 0.85),
    ("#8B4513", "#FFDB58", 0.70),
    // Red
    ("#E74C3C", "#000000", 0.80),
    ("#E74C3C", "#FFFFFF", 0.80),
    ("#E74C3C", "#1A1A2E", 0.70),
    // Blue
    ("#4169E1", "#FFFFFF", 0.85),
    ("#4169E1", "#808080", 0.70),
    ("#4169E1", "#FFDB58", 0.65),
    // Green
    ("#228B22", "#F5F5DC", 0.75),
    ("#228B22", "#8B4513", 0.70),
    // Pink
    ("#FFC0CB", "#808080", 0.80),
    ("#FFC0CB", "#1A1A2E", 0.70),
    ("#FFC0CB", "#FFFFFF", 0.70),
    // Gray
    ("#808080", "#000000", 0.80),
    ("#808080", "#FFC0CB", 0.70),
    ("#808080", "#4169E1", 0.70),
    // Bordeaux
    ("#722F37", "#D4A574", 0.75),
    ("#722F37", "#F5F5DC", 0.70),
    // Mustard
    ("#FFDB58", "#8B4513", 0.75),
    ("#FFDB58", "#36454F", 0.70),
    // Charcoal
    ("#36454F", "#FFFFFF", 0.75),
    ("#36454F", "#FFDB58", 0.70),
];

/// Insert seed rows that are not already present
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    for (id, name) in CATEGORIES {
        sqlx::query("INSERT OR IGNORE INTO categories (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?;
    }

    for (base_hex, match_hex, score) in COLOR_PAIRS {
        sqlx::query(
            "INSERT OR IGNORE INTO color_pairs (base_hex, match_hex, score) VALUES (?, ?, ?)",
        )
        .bind(base_hex)
        .bind(match_hex)
        .bind(score)
        .execute(pool)
        .await?;
    }

    tracing::debug!(
        categories = CATEGORIES.len(),
        color_pairs = COLOR_PAIRS.len(),
        "Seed data applied"
    );

    Ok(())
}
