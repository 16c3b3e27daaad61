//! Hex/RGB/HSV conversion and the perceptual distance metric
//!
//! All comparisons in the engine run over HSV with `h` in [0,360) and
//! `s`,`v` in [0,1]. Hex values are normalized to upper-case `#RRGGBB`
//! for storage and lookups; a leading `#` is optional on input.

use thiserror::Error;

/// Color parsing/validation errors
#[derive(Debug, Error)]
pub enum ColorError {
    /// Input did not match `^#?[0-9A-Fa-f]{6}$`
    #[error("Invalid hex color format: {0}")]
    InvalidFormat(String),
}

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV color, `h` in [0,360), `s` and `v` in [0,1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

// Distance weights: hue dominates perceptual similarity for clothing
// colors, saturation and value refine it.
const HUE_WEIGHT: f64 = 0.5;
const SATURATION_WEIGHT: f64 = 0.3;
const VALUE_WEIGHT: f64 = 0.2;

/// Normalize a hex color to upper-case `#RRGGBB`
pub fn normalize_hex(hex: &str) -> Result<String, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidFormat(hex.to_string()));
    }
    Ok(format!("#{}", digits.to_ascii_uppercase()))
}

/// Parse a 6-digit hex color into RGB
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidFormat(hex.to_string()));
    }
    let parse = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| ColorError::InvalidFormat(hex.to_string()))
    };
    Ok(Rgb {
        r: parse(0..2)?,
        g: parse(2..4)?,
        b: parse(4..6)?,
    })
}

/// Convert RGB to HSV
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = 0.0;
    if delta != 0.0 {
        h = if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
    }
    if h < 0.0 {
        h += 360.0;
    }

    let s = if max == 0.0 { 0.0 } else { delta / max };

    Hsv { h, s, v: max }
}

/// Convert HSV back to RGB
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let c = hsv.v * hsv.s;
    let h = hsv.h / 60.0;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = hsv.v - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb {
        r: ((r + m) * 255.0).round() as u8,
        g: ((g + m) * 255.0).round() as u8,
        b: ((b + m) * 255.0).round() as u8,
    }
}

/// Parse a hex color straight to HSV
pub fn hex_to_hsv(hex: &str) -> Result<Hsv, ColorError> {
    Ok(rgb_to_hsv(hex_to_rgb(hex)?))
}

/// Rec. 601 luma of an RGB triple, 0-255
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 * 299.0 + g as f64 * 587.0 + b as f64 * 114.0) / 1000.0
}

/// Circular hue delta in degrees, always in [0,180]
pub fn hue_delta(h1: f64, h2: f64) -> f64 {
    let diff = (h1 - h2).abs();
    diff.min(360.0 - diff)
}

/// Weighted perceptual distance between two HSV colors
///
/// Zero on identity and symmetric by construction; no triangle-inequality
/// guarantee is claimed.
pub fn hsv_distance_raw(a: Hsv, b: Hsv) -> f64 {
    let hue_term = hue_delta(a.h, b.h) / 360.0;
    let sat_term = a.s - b.s;
    let val_term = a.v - b.v;

    (hue_term.powi(2) * HUE_WEIGHT
        + sat_term.powi(2) * SATURATION_WEIGHT
        + val_term.powi(2) * VALUE_WEIGHT)
        .sqrt()
}

/// Weighted perceptual distance between two hex colors
pub fn hsv_distance(hex1: &str, hex2: &str) -> Result<f64, ColorError> {
    Ok(hsv_distance_raw(hex_to_hsv(hex1)?, hex_to_hsv(hex2)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_with_and_without_hash() {
        assert_eq!(normalize_hex("2c3e50").unwrap(), "#2C3E50");
        assert_eq!(normalize_hex("#2C3E50").unwrap(), "#2C3E50");
        assert_eq!(normalize_hex("#ffffff").unwrap(), "#FFFFFF");
    }

    #[test]
    fn normalize_rejects_malformed_input() {
        for bad in ["", "#FFF", "12345", "1234567", "#GGGGGG", "not a color"] {
            assert!(normalize_hex(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn hex_to_rgb_parses_channels() {
        let rgb = hex_to_rgb("#2C3E50").unwrap();
        assert_eq!(rgb, Rgb { r: 0x2C, g: 0x3E, b: 0x50 });
    }

    #[test]
    fn primary_colors_convert_to_expected_hsv() {
        let red = hex_to_hsv("#FF0000").unwrap();
        assert!((red.h - 0.0).abs() < 1e-9);
        assert!((red.s - 1.0).abs() < 1e-9);
        assert!((red.v - 1.0).abs() < 1e-9);

        let green = hex_to_hsv("#00FF00").unwrap();
        assert!((green.h - 120.0).abs() < 1e-9);

        let blue = hex_to_hsv("#0000FF").unwrap();
        assert!((blue.h - 240.0).abs() < 1e-9);

        let white = hex_to_hsv("#FFFFFF").unwrap();
        assert_eq!(white.s, 0.0);
        assert_eq!(white.v, 1.0);
    }

    #[test]
    fn hsv_derivation_is_stable() {
        // Re-deriving HSV from the same hex yields identical values.
        let first = hex_to_hsv("#8B4513").unwrap();
        let second = hex_to_hsv("#8B4513").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn hsv_to_rgb_round_trips_primaries() {
        for hex in ["#FF0000", "#00FF00", "#0000FF", "#FFFFFF", "#000000"] {
            let rgb = hex_to_rgb(hex).unwrap();
            assert_eq!(hsv_to_rgb(rgb_to_hsv(rgb)), rgb);
        }
    }

    #[test]
    fn distance_is_zero_on_identity() {
        for hex in ["#000000", "#FFFFFF", "#E74C3C", "#4169E1"] {
            assert_eq!(hsv_distance(hex, hex).unwrap(), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [("#E74C3C", "#4169E1"), ("#000000", "#FFFFFF"), ("#D4A574", "#228B22")];
        for (a, b) in pairs {
            let ab = hsv_distance(a, b).unwrap();
            let ba = hsv_distance(b, a).unwrap();
            assert!((ab - ba).abs() < 1e-12);
        }
    }

    #[test]
    fn hue_delta_wraps_around_the_circle() {
        assert_eq!(hue_delta(350.0, 10.0), 20.0);
        assert_eq!(hue_delta(0.0, 180.0), 180.0);
        assert_eq!(hue_delta(90.0, 90.0), 0.0);
    }

    #[test]
    fn distance_rejects_malformed_hex() {
        assert!(hsv_distance("#XYZXYZ", "#FFFFFF").is_err());
    }
}
