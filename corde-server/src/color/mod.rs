//! Color space utilities and the color-intelligence engine
//!
//! `space` holds the conversion primitives and the perceptual distance
//! metric; `engine` answers nearest/matching-color queries over persisted
//! outfit palettes and the curated compatibility graph; `harmony` classifies
//! two-color pairings and generates the natural-language explanations.

pub mod engine;
pub mod harmony;
pub mod space;

pub use space::{hex_to_hsv, hex_to_rgb, hsv_distance, normalize_hex, ColorError, Hsv, Rgb};
