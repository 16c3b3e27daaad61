//! Style-specific filter parameters and application
//!
//! Each illustration style is a closed variant carrying its own filter
//! parameters, selected once at job creation and immutable for the job's
//! lifetime.

use image::{DynamicImage, RgbImage};

use crate::color::space::{hsv_to_rgb, rgb_to_hsv, Rgb};
use crate::models::Style;

/// Linear contrast stretch: `p' = gain * p + bias`, clamped to [0,255]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearContrast {
    pub gain: f32,
    pub bias: f32,
}

/// Filter parameters of one illustration style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleParams {
    /// Drop chroma entirely before the other filters
    pub grayscale: bool,
    /// Contrast stretch applied to the grayscale copy
    pub contrast: Option<LinearContrast>,
    /// Gaussian blur radius applied last
    pub blur_sigma: Option<f32>,
    /// Unsharp-mask radius applied first
    pub sharpen_sigma: Option<f32>,
    /// Saturation multiplier (1.0 = unchanged)
    pub saturation: f32,
    /// Brightness multiplier (1.0 = unchanged)
    pub brightness: f32,
    /// Scale factor for the edge-enhancement response
    pub edge_strength: f32,
}

/// Filter parameters for a style
pub fn params_for(style: Style) -> StyleParams {
    match style {
        // Sketch: high contrast grayscale with a hint of blur, heaviest
        // line work.
        Style::Sketch => StyleParams {
            grayscale: true,
            contrast: Some(LinearContrast { gain: 1.5, bias: -(128.0 * 0.5) }),
            blur_sigma: Some(0.3),
            sharpen_sigma: None,
            saturation: 1.0,
            brightness: 1.0,
            edge_strength: 3.0,
        },
        // Minimal: moderate desaturation, slightly brightened.
        Style::Minimal => StyleParams {
            grayscale: false,
            contrast: None,
            blur_sigma: None,
            sharpen_sigma: None,
            saturation: 0.7,
            brightness: 1.1,
            edge_strength: 1.0,
        },
        // Detailed: sharpened with boosted saturation.
        Style::Detailed => StyleParams {
            grayscale: false,
            contrast: None,
            blur_sigma: None,
            sharpen_sigma: Some(2.0),
            saturation: 1.2,
            brightness: 1.0,
            edge_strength: 2.0,
        },
        // Standard: mild desaturation only.
        Style::Standard => StyleParams {
            grayscale: false,
            contrast: None,
            blur_sigma: None,
            sharpen_sigma: None,
            saturation: 0.9,
            brightness: 1.0,
            edge_strength: 1.5,
        },
    }
}

/// Apply a style's filters to the normalized image
pub fn apply_style(image: RgbImage, params: &StyleParams) -> RgbImage {
    let mut current = image;

    if let Some(sigma) = params.sharpen_sigma {
        current = image::imageops::unsharpen(&current, sigma, 0);
    }

    if params.grayscale {
        let mut gray = DynamicImage::ImageRgb8(current).to_luma8();
        if let Some(contrast) = params.contrast {
            for pixel in gray.pixels_mut() {
                let stretched = contrast.gain * pixel.0[0] as f32 + contrast.bias;
                pixel.0[0] = stretched.clamp(0.0, 255.0) as u8;
            }
        }
        current = DynamicImage::ImageLuma8(gray).to_rgb8();
    }

    if params.saturation != 1.0 || params.brightness != 1.0 {
        modulate(&mut current, params.saturation as f64, params.brightness as f64);
    }

    if let Some(sigma) = params.blur_sigma {
        current = image::imageops::blur(&current, sigma);
    }

    current
}

/// Scale saturation and brightness in HSV space, per pixel
fn modulate(image: &mut RgbImage, saturation: f64, brightness: f64) {
    for pixel in image.pixels_mut() {
        let mut hsv = rgb_to_hsv(Rgb { r: pixel.0[0], g: pixel.0[1], b: pixel.0[2] });
        hsv.s = (hsv.s * saturation).clamp(0.0, 1.0);
        hsv.v = (hsv.v * brightness).clamp(0.0, 1.0);
        let rgb = hsv_to_rgb(hsv);
        pixel.0 = [rgb.r, rgb.g, rgb.b];
    }
}
