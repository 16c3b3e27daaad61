//! Palette and compatibility-graph models
//!
//! A palette is stored on an outfit record as a JSON array of
//! `PaletteItem`s. The curated compatibility table is a static directed
//! weighted graph the color engine only reads.

use serde::{Deserialize, Serialize};

use crate::color::space::{hex_to_rgb, Rgb};

/// Semantic role of an extracted swatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwatchRole {
    Primary,
    Secondary,
    Accent,
    Neutral,
}

/// RGB triple as serialized inside palette JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbTriple {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<Rgb> for RgbTriple {
    fn from(rgb: Rgb) -> Self {
        Self { r: rgb.r, g: rgb.g, b: rgb.b }
    }
}

/// One extracted color with its estimated area share and role
///
/// Ratios across a palette are independent per-swatch estimates and need
/// not sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteItem {
    pub hex: String,
    pub ratio: f64,
    pub role: SwatchRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb: Option<RgbTriple>,
}

impl PaletteItem {
    /// RGB of this swatch, preferring the stored triple and falling back
    /// to the hex value; None when the stored hex is malformed.
    pub fn effective_rgb(&self) -> Option<Rgb> {
        if let Some(rgb) = self.rgb {
            return Some(Rgb { r: rgb.r, g: rgb.g, b: rgb.b });
        }
        hex_to_rgb(&self.hex).ok()
    }
}

/// An outfit record's palette with its popularity, as loaded for the
/// color engine
#[derive(Debug, Clone)]
pub struct PaletteCode {
    pub id: String,
    pub likes: i64,
    pub palette: Vec<PaletteItem>,
}

/// One curated compatibility edge (base → match, weighted)
#[derive(Debug, Clone)]
pub struct CuratedPair {
    pub base_hex: String,
    pub match_hex: String,
    pub score: f64,
}
