//! Harmony classification and pairing explanations
//!
//! Classifies a two-color pairing into one of six harmony types from the
//! circular hue delta, then renders a fixed explanation paragraph plus a
//! small set of styling tips. Everything here is constant-driven; nothing
//! is learned.

use serde::{Deserialize, Serialize};

use super::space::{hex_to_hsv, hue_delta, ColorError, Hsv};

/// Harmony type of a two-color pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyType {
    Complementary,
    Analogous,
    Triadic,
    SplitComplementary,
    Monochromatic,
    Neutral,
}

/// Explanation of a two-color pairing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairExplanation {
    pub base_hex: String,
    pub match_hex: String,
    pub harmony_type: HarmonyType,
    pub explanation: String,
    pub tips: Vec<String>,
}

// Both colors below this saturation read as achromatic.
const NEUTRAL_SATURATION: f64 = 0.2;

// Tip thresholds over the pairing's brightness/saturation averages.
const BRIGHT_PAIR_VALUE: f64 = 0.7;
const DARK_PAIR_VALUE: f64 = 0.4;
const VIVID_PAIR_SATURATION: f64 = 0.6;
const MUTED_PAIR_SATURATION: f64 = 0.3;

/// Classify the harmony type of two colors
///
/// The triadic band (110-130) overlaps the split-complementary band
/// (120-150); triadic is checked first and wins the overlap. That ordering
/// is part of the observable behavior and is covered by the boundary tests
/// below.
pub fn classify(base: Hsv, matched: Hsv) -> HarmonyType {
    if base.s < NEUTRAL_SATURATION && matched.s < NEUTRAL_SATURATION {
        return HarmonyType::Neutral;
    }

    let delta = hue_delta(base.h, matched.h);

    if delta < 30.0 {
        return HarmonyType::Monochromatic;
    }
    if delta < 60.0 {
        return HarmonyType::Analogous;
    }
    if (110.0..=130.0).contains(&delta) {
        return HarmonyType::Triadic;
    }
    if (120.0..150.0).contains(&delta) || (delta > 210.0 && delta <= 240.0) {
        return HarmonyType::SplitComplementary;
    }
    if (150.0..=210.0).contains(&delta) {
        return HarmonyType::Complementary;
    }

    HarmonyType::Analogous
}

/// Explain why two colors work together
pub fn explain_pair(base_hex: &str, match_hex: &str) -> Result<PairExplanation, ColorError> {
    let base = hex_to_hsv(base_hex)?;
    let matched = hex_to_hsv(match_hex)?;

    let harmony_type = classify(base, matched);

    Ok(PairExplanation {
        base_hex: base_hex.to_string(),
        match_hex: match_hex.to_string(),
        harmony_type,
        explanation: explanation_for(harmony_type).to_string(),
        tips: generate_tips(base, matched, harmony_type),
    })
}

/// Fixed explanation paragraph per harmony type
fn explanation_for(harmony: HarmonyType) -> &'static str {
    match harmony {
        HarmonyType::Complementary => {
            "A complementary pairing. These hues sit on opposite sides of the color wheel, \
             so they intensify each other and create strong visual impact."
        }
        HarmonyType::Analogous => {
            "An analogous pairing. Neighboring hues on the color wheel blend naturally and \
             give a calm, harmonious impression."
        }
        HarmonyType::Triadic => {
            "A triadic scheme. Hues spaced evenly around the color wheel balance each other \
             while keeping the outfit lively and colorful."
        }
        HarmonyType::SplitComplementary => {
            "A split-complementary pairing. Leaning on colors adjacent to the true complement \
             keeps the contrast interesting without becoming overpowering."
        }
        HarmonyType::Monochromatic => {
            "A monochromatic pairing. Varying lightness and saturation within one hue gives a \
             unified, refined impression."
        }
        HarmonyType::Neutral => {
            "A neutral pairing. Achromatic tones such as white, black, gray and beige go with \
             almost anything and read as calm and composed."
        }
    }
}

/// 2-4 contextual styling tips for the pairing
fn generate_tips(base: Hsv, matched: Hsv, harmony: HarmonyType) -> Vec<String> {
    let mut tips = Vec::new();

    match harmony {
        HarmonyType::Complementary => {
            tips.push(
                "Keep the area ratio around 7:3 so one color leads and the other accents."
                    .to_string(),
            );
            tips.push(
                "Equal areas of complementary colors look noisy; let one of them dominate."
                    .to_string(),
            );
        }
        HarmonyType::Analogous => {
            tips.push(
                "Analogous colors are hard to get wrong; staying within three hues keeps the \
                 look polished."
                    .to_string(),
            );
            tips.push("Vary the lightness between pieces to add definition.".to_string());
        }
        HarmonyType::Monochromatic => {
            tips.push(
                "Single-hue outfits unify easily but can turn flat; mix materials and textures \
                 for variety."
                    .to_string(),
            );
            tips.push("A large lightness gap between pieces adds depth.".to_string());
        }
        HarmonyType::Neutral => {
            tips.push(
                "Neutrals are versatile; a small pop of a vivid color sharpens the whole \
                 outfit."
                    .to_string(),
            );
            tips.push(
                "Combining different materials such as leather, knit and denim keeps neutral \
                 looks from feeling plain."
                    .to_string(),
            );
        }
        HarmonyType::Triadic | HarmonyType::SplitComplementary => {
            tips.push(
                "With three colors, pick one as the main and use the others as sub and accent."
                    .to_string(),
            );
            tips.push("An area ratio near 6:3:1 keeps a three-color outfit balanced.".to_string());
        }
    }

    let avg_value = (base.v + matched.v) / 2.0;
    let avg_saturation = (base.s + matched.s) / 2.0;

    if avg_value > BRIGHT_PAIR_VALUE {
        tips.push(
            "Bright combinations suit spring and summer, giving a light, fresh impression."
                .to_string(),
        );
    } else if avg_value < DARK_PAIR_VALUE {
        tips.push(
            "Dark combinations suit autumn and winter, giving a composed, mature impression."
                .to_string(),
        );
    }

    if avg_saturation > VIVID_PAIR_SATURATION {
        tips.push(
            "Vivid combinations feel energetic and festive; ideal for special occasions."
                .to_string(),
        );
    } else if avg_saturation < MUTED_PAIR_SATURATION {
        tips.push(
            "Muted combinations feel soft and gentle, easy to wear in everyday outfits."
                .to_string(),
        );
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsv(h: f64) -> Hsv {
        Hsv { h, s: 1.0, v: 1.0 }
    }

    fn classify_delta(delta: f64) -> HarmonyType {
        classify(hsv(0.0), hsv(delta))
    }

    #[test]
    fn neutral_wins_when_both_saturations_low() {
        let a = Hsv { h: 0.0, s: 0.1, v: 0.9 };
        let b = Hsv { h: 180.0, s: 0.19, v: 0.2 };
        assert_eq!(classify(a, b), HarmonyType::Neutral);
    }

    #[test]
    fn one_saturated_color_is_not_neutral() {
        let a = Hsv { h: 0.0, s: 0.1, v: 0.9 };
        let b = Hsv { h: 10.0, s: 0.8, v: 0.5 };
        assert_eq!(classify(a, b), HarmonyType::Monochromatic);
    }

    #[test]
    fn bucket_boundaries_classify_per_table() {
        assert_eq!(classify_delta(0.0), HarmonyType::Monochromatic);
        assert_eq!(classify_delta(29.9), HarmonyType::Monochromatic);
        assert_eq!(classify_delta(30.0), HarmonyType::Analogous);
        assert_eq!(classify_delta(59.9), HarmonyType::Analogous);
        // 60-110 falls through every band and lands on the analogous default.
        assert_eq!(classify_delta(60.0), HarmonyType::Analogous);
        assert_eq!(classify_delta(90.0), HarmonyType::Analogous);
        assert_eq!(classify_delta(110.0), HarmonyType::Triadic);
        assert_eq!(classify_delta(130.0), HarmonyType::Triadic);
        assert_eq!(classify_delta(131.0), HarmonyType::SplitComplementary);
        assert_eq!(classify_delta(149.9), HarmonyType::SplitComplementary);
        assert_eq!(classify_delta(150.0), HarmonyType::Complementary);
        assert_eq!(classify_delta(180.0), HarmonyType::Complementary);
    }

    #[test]
    fn triadic_wins_the_overlap_with_split_complementary() {
        // 120-130 sits in both the triadic and split-complementary bands;
        // triadic is evaluated first.
        assert_eq!(classify_delta(120.0), HarmonyType::Triadic);
        assert_eq!(classify_delta(125.0), HarmonyType::Triadic);
        assert_eq!(classify_delta(130.0), HarmonyType::Triadic);
        assert_eq!(classify_delta(135.0), HarmonyType::SplitComplementary);
    }

    #[test]
    fn deltas_above_180_reduce_by_circularity() {
        // hue_delta folds deltas into [0,180], so the 210-240 band of the
        // split-complementary rule is only reachable through raw differences;
        // a 215-degree difference folds to 145 and is split-complementary.
        assert_eq!(classify(hsv(0.0), hsv(215.0)), HarmonyType::SplitComplementary);
        // A 210-degree difference folds to 150: complementary.
        assert_eq!(classify(hsv(0.0), hsv(210.0)), HarmonyType::Complementary);
        // A 240-degree difference folds to 120, where triadic wins the overlap.
        assert_eq!(classify(hsv(0.0), hsv(240.0)), HarmonyType::Triadic);
    }

    #[test]
    fn red_cyan_is_complementary() {
        let explanation = explain_pair("#FF0000", "#00FFFF").unwrap();
        assert_eq!(explanation.harmony_type, HarmonyType::Complementary);
        assert!(!explanation.explanation.is_empty());
    }

    #[test]
    fn red_and_light_red_is_monochromatic() {
        let explanation = explain_pair("#FF0000", "#FF6666").unwrap();
        assert_eq!(explanation.harmony_type, HarmonyType::Monochromatic);
    }

    #[test]
    fn classification_depends_only_on_hue_given_fixed_saturation() {
        let a = Hsv { h: 10.0, s: 0.9, v: 0.3 };
        let b = Hsv { h: 190.0, s: 0.5, v: 0.9 };
        let c = Hsv { h: 10.0, s: 0.7, v: 0.7 };
        let d = Hsv { h: 190.0, s: 0.9, v: 0.1 };
        assert_eq!(classify(a, b), classify(c, d));
    }

    #[test]
    fn tip_count_stays_between_two_and_four() {
        let pairs = [
            ("#FF0000", "#00FFFF"),
            ("#FFFFFF", "#EEEEEE"),
            ("#112233", "#223344"),
            ("#FFDB58", "#40E0D0"),
        ];
        for (base, matched) in pairs {
            let explanation = explain_pair(base, matched).unwrap();
            assert!(
                (2..=4).contains(&explanation.tips.len()),
                "{base}/{matched} produced {} tips",
                explanation.tips.len()
            );
        }
    }

    #[test]
    fn bright_pairs_get_the_warm_season_tip() {
        let explanation = explain_pair("#FFEEAA", "#AAEEFF").unwrap();
        assert!(explanation
            .tips
            .iter()
            .any(|tip| tip.contains("spring and summer")));
    }

    #[test]
    fn dark_pairs_get_the_cool_season_tip() {
        let explanation = explain_pair("#1A1A2E", "#36454F").unwrap();
        assert!(explanation
            .tips
            .iter()
            .any(|tip| tip.contains("autumn and winter")));
    }

    #[test]
    fn serde_uses_kebab_case_names() {
        let json = serde_json::to_string(&HarmonyType::SplitComplementary).unwrap();
        assert_eq!(json, "\"split-complementary\"");
    }
}
