//! Nearest-color search and compatible-color recommendation
//!
//! All queries here are pure functions over pre-loaded rows: the active
//! outfit palettes (ordered by likes, descending) and the curated
//! compatibility graph. Loading lives in the `db` module; the engine never
//! touches storage itself.

use std::collections::{HashMap, HashSet};

use crate::models::{CuratedPair, PaletteCode};

use super::space::{hsv_distance, normalize_hex, ColorError};

/// Hard cap on result list sizes
pub const MAX_RESULTS: usize = 20;

/// A curated base within this distance of the query also contributes its
/// matches, scaled by (1 - distance).
const NEAR_BASE_DISTANCE: f64 = 0.15;

/// Palette colors within this distance of the query count as "contains the
/// query color" for co-occurrence mining.
const COOCCURRENCE_DISTANCE: f64 = 0.12;

/// Candidates at or below this distance are near-duplicates of the query
/// and never recommended.
const NEAR_DUPLICATE_DISTANCE: f64 = 0.08;

/// Outfits at or above this like count count as popular.
const POPULAR_LIKES_THRESHOLD: i64 = 100;

/// Weight of the co-occurrence pool relative to curated scores.
const COOCCURRENCE_POOL_SCALE: f64 = 0.5;

/// Outfits containing a color within this distance of the query are
/// related to it.
pub const RELATED_CODE_DISTANCE: f64 = 0.15;

/// Find the colors closest to `target_hex` across everything persisted
///
/// The candidate pool is the union of every hex in any active outfit
/// palette and every hex in the compatibility graph. The query color
/// itself is excluded.
pub fn find_similar_colors(
    target_hex: &str,
    codes: &[PaletteCode],
    pairs: &[CuratedPair],
    limit: usize,
) -> Result<Vec<String>, ColorError> {
    let target = normalize_hex(target_hex)?;

    let mut pool = HashSet::new();
    for code in codes {
        for item in &code.palette {
            if let Ok(hex) = normalize_hex(&item.hex) {
                pool.insert(hex);
            }
        }
    }
    for pair in pairs {
        if let Ok(hex) = normalize_hex(&pair.base_hex) {
            pool.insert(hex);
        }
        if let Ok(hex) = normalize_hex(&pair.match_hex) {
            pool.insert(hex);
        }
    }

    let mut ranked: Vec<(String, f64)> = pool
        .into_iter()
        .filter(|hex| *hex != target)
        .filter_map(|hex| hsv_distance(&target, &hex).ok().map(|d| (hex, d)))
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit.min(MAX_RESULTS));

    Ok(ranked.into_iter().map(|(hex, _)| hex).collect())
}

/// Recommend colors that pair well with `target_hex`
///
/// Aggregates three score sources into one map keyed by candidate hex:
/// exact curated edges, near-curated edges scaled by (1 - distance), and
/// popularity-weighted co-occurrence mined from well-liked outfits.
/// Near-duplicates of the query are excluded from the result.
pub fn find_matching_colors(
    target_hex: &str,
    pairs: &[CuratedPair],
    codes: &[PaletteCode],
    limit: usize,
) -> Result<Vec<String>, ColorError> {
    let target = normalize_hex(target_hex)?;
    let mut scores: HashMap<String, f64> = HashMap::new();

    // Source 1: exact curated edges for this base.
    for pair in pairs {
        let base = match normalize_hex(&pair.base_hex) {
            Ok(hex) => hex,
            Err(_) => continue,
        };
        if base == target {
            if let Ok(hex) = normalize_hex(&pair.match_hex) {
                scores.insert(hex, pair.score);
            }
        }
    }

    // Source 2: curated bases near the query also vouch for their matches,
    // discounted by how far the base sits from the query. The maximum wins
    // when a candidate recurs.
    let mut bases: HashSet<String> = HashSet::new();
    for pair in pairs {
        if let Ok(hex) = normalize_hex(&pair.base_hex) {
            bases.insert(hex);
        }
    }
    for base in bases {
        let distance = hsv_distance(&target, &base)?;
        if distance > 0.0 && distance < NEAR_BASE_DISTANCE {
            for pair in pairs {
                let pair_base = match normalize_hex(&pair.base_hex) {
                    Ok(hex) => hex,
                    Err(_) => continue,
                };
                if pair_base != base {
                    continue;
                }
                let hex = match normalize_hex(&pair.match_hex) {
                    Ok(hex) => hex,
                    Err(_) => continue,
                };
                let adjusted = pair.score * (1.0 - distance);
                let entry = scores.entry(hex).or_insert(0.0);
                *entry = entry.max(adjusted);
            }
        }
    }

    // Source 3: co-occurrence in popular outfits.
    let cooccurrence = mine_popular_cooccurrence(&target, codes);
    for (hex, score) in cooccurrence {
        *scores.entry(hex).or_insert(0.0) += score * COOCCURRENCE_POOL_SCALE;
    }

    // Drop near-duplicates of the query, rank by score.
    let mut ranked: Vec<(String, f64)> = scores
        .into_iter()
        .filter(|(hex, _)| {
            hsv_distance(&target, hex).map(|d| d > NEAR_DUPLICATE_DISTANCE).unwrap_or(false)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit.min(MAX_RESULTS));

    Ok(ranked.into_iter().map(|(hex, _)| hex).collect())
}

/// Mine compatible colors from outfits popular enough to trust
///
/// An outfit qualifies when its palette holds a color within
/// `COOCCURRENCE_DISTANCE` of the query; every *other* palette color then
/// earns `log10(likes + 1) / 4`, summed across all qualifying outfits.
fn mine_popular_cooccurrence(target: &str, codes: &[PaletteCode]) -> HashMap<String, f64> {
    let mut matching: HashMap<String, f64> = HashMap::new();

    for code in codes {
        if code.likes < POPULAR_LIKES_THRESHOLD {
            continue;
        }

        let hexes: Vec<String> = code
            .palette
            .iter()
            .filter_map(|item| normalize_hex(&item.hex).ok())
            .collect();

        let contains_target = hexes.iter().any(|hex| {
            hsv_distance(target, hex).map(|d| d < COOCCURRENCE_DISTANCE).unwrap_or(false)
        });
        if !contains_target {
            continue;
        }

        let like_score = ((code.likes + 1) as f64).log10() / 4.0;
        for hex in &hexes {
            let far_enough = hsv_distance(target, hex)
                .map(|d| d >= COOCCURRENCE_DISTANCE)
                .unwrap_or(false);
            if far_enough {
                *matching.entry(hex.clone()).or_insert(0.0) += like_score;
            }
        }
    }

    matching
}

/// Ids of outfits containing `target_hex` or a color near it
///
/// `codes` is expected pre-ordered by likes descending; the order is
/// preserved in the result.
pub fn find_codes_by_color(
    target_hex: &str,
    codes: &[PaletteCode],
    threshold: f64,
) -> Result<Vec<String>, ColorError> {
    let target = normalize_hex(target_hex)?;
    let mut matching = Vec::new();

    for code in codes {
        let contains = code.palette.iter().any(|item| {
            normalize_hex(&item.hex)
                .ok()
                .and_then(|hex| hsv_distance(&target, &hex).ok())
                .map(|d| d <= threshold)
                .unwrap_or(false)
        });
        if contains {
            matching.push(code.id.clone());
        }
    }

    Ok(matching)
}

/// Fashion color vocabulary for naming swatches
const COLOR_NAMES: &[(&str, &str)] = &[
    ("#000000", "Black"),
    ("#FFFFFF", "White"),
    ("#808080", "Gray"),
    ("#1A1A2E", "Navy"),
    ("#F5F5DC", "Beige"),
    ("#D4A574", "Camel"),
    ("#8B4513", "Brown"),
    ("#E74C3C", "Red"),
    ("#FFA500", "Orange"),
    ("#FFFF00", "Yellow"),
    ("#FFC0CB", "Pink"),
    ("#4169E1", "Blue"),
    ("#87CEEB", "Light Blue"),
    ("#228B22", "Green"),
    ("#556B2F", "Olive"),
    ("#800080", "Purple"),
    ("#722F37", "Bordeaux"),
    ("#FFDB58", "Mustard"),
    ("#40E0D0", "Turquoise"),
    ("#6B8E23", "Khaki"),
    ("#36454F", "Charcoal"),
    ("#E2725B", "Terracotta"),
    ("#4682B4", "Saxe Blue"),
    ("#FF7F50", "Coral"),
    ("#98FF98", "Mint Green"),
    ("#D3D3D3", "Light Gray"),
    ("#FAF9F6", "Off White"),
    ("#FFFDD0", "Cream"),
];

/// Human-readable name of the nearest known fashion color
///
/// Returns None when nothing in the vocabulary is closer than the related
/// threshold.
pub fn color_name(hex: &str) -> Result<Option<&'static str>, ColorError> {
    let target = normalize_hex(hex)?;

    if let Some((_, name)) = COLOR_NAMES.iter().find(|(known, _)| *known == target) {
        return Ok(Some(name));
    }

    let mut closest: Option<(&'static str, f64)> = None;
    for (known, name) in COLOR_NAMES {
        let distance = hsv_distance(&target, known)?;
        if closest.map(|(_, best)| distance < best).unwrap_or(true) {
            closest = Some((name, distance));
        }
    }

    Ok(closest.filter(|(_, d)| *d < RELATED_CODE_DISTANCE).map(|(name, _)| name))
}
