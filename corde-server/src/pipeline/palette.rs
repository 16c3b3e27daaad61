//! Dominant-color extraction with vibrancy-based role assignment
//!
//! Quantizes the *original* (unstyled) image into a coarse RGB histogram,
//! then assigns up to four swatches to semantic roles by perceptual
//! criteria: most vibrant → primary, darkest vibrant → secondary, lightest
//! vibrant → accent, most muted → neutral. A role whose characteristic
//! swatch is absent is omitted, never substituted.

use image::DynamicImage;

use crate::color::space::{rgb_to_hsv, Rgb};
use crate::models::{PaletteItem, RgbTriple, SwatchRole};

/// Sampling dimension; the source image is thumbnailed before counting.
const SAMPLE_DIM: u32 = 128;

/// Histogram bucket resolution: 4 bits per channel.
const BUCKET_SHIFT: u8 = 4;

/// Buckets below this share of samples are noise.
const MIN_POPULATION_RATIO: f64 = 0.01;

/// One histogram bucket candidate
#[derive(Debug, Clone, Copy)]
struct Candidate {
    rgb: Rgb,
    /// Share of sampled pixels in this bucket, 0-1
    ratio: f64,
    saturation: f64,
    value: f64,
}

/// Saturation/value targets for one role
struct RoleTarget {
    role: SwatchRole,
    saturation_target: f64,
    saturation_min: f64,
    saturation_max: f64,
    value_target: f64,
    value_min: f64,
    value_max: f64,
}

// Role targets mirror the classic vibrant/dark-vibrant/light-vibrant/muted
// buckets.
const ROLE_TARGETS: [RoleTarget; 4] = [
    RoleTarget {
        role: SwatchRole::Primary,
        saturation_target: 1.0,
        saturation_min: 0.35,
        saturation_max: 1.0,
        value_target: 0.5,
        value_min: 0.3,
        value_max: 0.7,
    },
    RoleTarget {
        role: SwatchRole::Secondary,
        saturation_target: 1.0,
        saturation_min: 0.35,
        saturation_max: 1.0,
        value_target: 0.26,
        value_min: 0.0,
        value_max: 0.45,
    },
    RoleTarget {
        role: SwatchRole::Accent,
        saturation_target: 1.0,
        saturation_min: 0.35,
        saturation_max: 1.0,
        value_target: 0.74,
        value_min: 0.55,
        value_max: 1.0,
    },
    RoleTarget {
        role: SwatchRole::Neutral,
        saturation_target: 0.3,
        saturation_min: 0.0,
        saturation_max: 0.4,
        value_target: 0.5,
        value_min: 0.2,
        value_max: 0.8,
    },
];

/// Extract up to four role-assigned swatches from an image
pub fn extract_palette(image: &DynamicImage) -> Vec<PaletteItem> {
    let candidates = quantize(image);
    let mut palette = Vec::new();
    let mut used: Vec<Rgb> = Vec::new();

    for target in &ROLE_TARGETS {
        if let Some(candidate) = pick_for_role(&candidates, target, &used) {
            used.push(candidate.rgb);
            palette.push(PaletteItem {
                hex: format!(
                    "#{:02X}{:02X}{:02X}",
                    candidate.rgb.r, candidate.rgb.g, candidate.rgb.b
                ),
                ratio: candidate.ratio,
                role: target.role,
                rgb: Some(RgbTriple::from(candidate.rgb)),
            });
        }
    }

    palette
}

/// Coarse RGB histogram over a thumbnail of the image
fn quantize(image: &DynamicImage) -> Vec<Candidate> {
    let thumb = image.thumbnail(SAMPLE_DIM, SAMPLE_DIM).to_rgb8();
    let total = (thumb.width() * thumb.height()) as f64;
    if total == 0.0 {
        return Vec::new();
    }

    // bucket key -> (count, sum_r, sum_g, sum_b)
    let mut buckets: std::collections::BTreeMap<u32, (u64, u64, u64, u64)> =
        std::collections::BTreeMap::new();

    for pixel in thumb.pixels() {
        let [r, g, b] = pixel.0;
        let key = ((r as u32 >> BUCKET_SHIFT) << 16)
            | ((g as u32 >> BUCKET_SHIFT) << 8)
            | (b as u32 >> BUCKET_SHIFT);
        let entry = buckets.entry(key).or_insert((0, 0, 0, 0));
        entry.0 += 1;
        entry.1 += r as u64;
        entry.2 += g as u64;
        entry.3 += b as u64;
    }

    buckets
        .into_values()
        .filter_map(|(count, sum_r, sum_g, sum_b)| {
            let ratio = count as f64 / total;
            if ratio < MIN_POPULATION_RATIO {
                return None;
            }
            let rgb = Rgb {
                r: (sum_r / count) as u8,
                g: (sum_g / count) as u8,
                b: (sum_b / count) as u8,
            };
            let hsv = rgb_to_hsv(rgb);
            Some(Candidate { rgb, ratio, saturation: hsv.s, value: hsv.v })
        })
        .collect()
}

/// Best candidate for a role, or None when nothing satisfies its ranges
fn pick_for_role(
    candidates: &[Candidate],
    target: &RoleTarget,
    used: &[Rgb],
) -> Option<Candidate> {
    let mut best: Option<(Candidate, f64)> = None;

    for candidate in candidates {
        if used.contains(&candidate.rgb) {
            continue;
        }
        if candidate.saturation < target.saturation_min
            || candidate.saturation > target.saturation_max
            || candidate.value < target.value_min
            || candidate.value > target.value_max
        {
            continue;
        }

        let score = (1.0 - (candidate.saturation - target.saturation_target).abs()) * 0.5
            + (1.0 - (candidate.value - target.value_target).abs()) * 0.3
            + candidate.ratio * 0.2;

        if best.map(|(_, b)| score > b).unwrap_or(true) {
            best = Some((*candidate, score));
        }
    }

    best.map(|(candidate, _)| candidate)
}
