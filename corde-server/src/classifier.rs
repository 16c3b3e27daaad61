//! Heuristic category/season/scene tagging from palette statistics
//!
//! This is a rule-based placeholder, not a trained model: a handful of
//! thresholds over per-swatch brightness, saturation and hue decide the
//! tags, and the reported confidence is a fixed constant.

use serde::Serialize;

use crate::color::space::Rgb;
use crate::models::PaletteItem;

/// Classifier output: garment categories plus season and scene tags
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub categories: Vec<String>,
    pub season_tags: Vec<String>,
    pub scene_tags: Vec<String>,
    /// Fixed constant; the rules above are too coarse to grade.
    pub confidence: f64,
}

const DARK_BRIGHTNESS: f64 = 100.0;
const LIGHT_BRIGHTNESS: f64 = 180.0;
const VIBRANT_SATURATION: f64 = 0.5;
const WARM_SEASON_AVG_BRIGHTNESS: f64 = 160.0;
const PASTEL_AVG_SATURATION: f64 = 0.4;
const PASTEL_AVG_BRIGHTNESS: f64 = 180.0;
const FIXED_CONFIDENCE: f64 = 0.7;

/// Classify a palette into category/season/scene tags
pub fn classify(palette: &[PaletteItem]) -> Classification {
    let rgbs: Vec<Rgb> = palette.iter().filter_map(|item| item.effective_rgb()).collect();

    let dark_count = rgbs.iter().filter(|rgb| brightness(**rgb) < DARK_BRIGHTNESS).count();
    let light_count = rgbs.iter().filter(|rgb| brightness(**rgb) > LIGHT_BRIGHTNESS).count();
    let vibrant_count = rgbs.iter().filter(|rgb| saturation(**rgb) > VIBRANT_SATURATION).count();

    let mut categories = vec!["tops".to_string()];
    if dark_count >= 2 {
        categories.push("bottoms".to_string());
    }
    if palette.len() >= 4 {
        categories.push("outer".to_string());
    }

    let avg_saturation = average(&rgbs, saturation);
    let avg_brightness = average(&rgbs, brightness);

    let mut season_tags = Vec::new();
    let mut scene_tags = Vec::new();

    if light_count > dark_count && avg_brightness > WARM_SEASON_AVG_BRIGHTNESS {
        season_tags.extend(["spring".to_string(), "summer".to_string()]);
        scene_tags.extend(["casual".to_string(), "outdoor".to_string()]);
    } else if dark_count > light_count {
        season_tags.extend(["autumn".to_string(), "winter".to_string()]);
        scene_tags.extend(["formal".to_string(), "business".to_string()]);
    }

    if vibrant_count >= 2 {
        scene_tags.extend(["party".to_string(), "date".to_string()]);
    } else {
        scene_tags.extend(["daily".to_string(), "office".to_string()]);
    }

    // Pastel palettes read as soft.
    if avg_saturation < PASTEL_AVG_SATURATION && avg_brightness > PASTEL_AVG_BRIGHTNESS {
        scene_tags.push("feminine".to_string());
    }

    Classification {
        categories: dedup(categories),
        season_tags: dedup(season_tags),
        scene_tags: dedup(scene_tags),
        confidence: FIXED_CONFIDENCE,
    }
}

/// Perceived brightness, 0-255
fn brightness(rgb: Rgb) -> f64 {
    crate::color::space::luma(rgb.r, rgb.g, rgb.b)
}

/// Chroma-based saturation, 0-1
fn saturation(rgb: Rgb) -> f64 {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == 0.0 {
        return 0.0;
    }
    (max - min) / max
}

fn average(rgbs: &[Rgb], metric: fn(Rgb) -> f64) -> f64 {
    if rgbs.is_empty() {
        return 0.0;
    }
    rgbs.iter().map(|rgb| metric(*rgb)).sum::<f64>() / rgbs.len() as f64
}

/// De-duplicate while preserving first-seen order
fn dedup(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|tag| seen.insert(tag.clone())).collect()
}
