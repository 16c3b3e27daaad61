//! Image transform pipeline
//!
//! Turns a raw outfit photo into a stylized illustration plus a dominant
//! color palette. The pipeline is an ordered sequence of stages, each
//! emitting a `(label, percent)` progress event at a fixed checkpoint:
//!
//! decode (10) → normalize (20) → background (35) → style filter (50) →
//! edge enhancement (70) → palette extraction (85) → persist (95) → done
//! (100)
//!
//! Failure at any stage aborts the whole run: no partial illustration or
//! palette is valid, and the caller records the job as failed.

pub mod palette;
pub mod styles;

use std::path::PathBuf;
use std::time::Instant;

use image::{DynamicImage, RgbImage};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::color::space::luma;
use crate::models::{PaletteItem, Style};

use styles::params_for;

/// Normalized illustration dimensions (3:5 portrait, crop-to-cover)
const TARGET_WIDTH: u32 = 480;
const TARGET_HEIGHT: u32 = 800;

/// Pixels at or above this luminance are treated as background and pushed
/// to pure white.
const BACKGROUND_LUMA: f64 = 240.0;

/// High-pass kernel for edge enhancement (before per-style scaling)
const EDGE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Progress checkpoint emitted by a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub label: &'static str,
    pub percent: u8,
}

/// Pipeline failure; aborts the run at the failing stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to encode output image: {0}")]
    Encode(image::ImageError),

    #[error("Failed to write {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Finished pipeline output
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub id: Uuid,
    /// URL path of the stored original photo
    pub original_url: String,
    /// URL path of the stored illustration
    pub illustration_url: String,
    pub palette: Vec<PaletteItem>,
    pub style: Style,
    pub processing_time_ms: u64,
}

/// The image transform pipeline
///
/// Owns the output directories; progress reporting is optional and goes
/// through an unbounded channel so the CPU-bound stages never block on a
/// consumer.
pub struct Pipeline {
    uploads_dir: PathBuf,
    processed_dir: PathBuf,
    progress_tx: Option<UnboundedSender<ProgressEvent>>,
}

impl Pipeline {
    pub fn new(uploads_dir: PathBuf, processed_dir: PathBuf) -> Self {
        Self { uploads_dir, processed_dir, progress_tx: None }
    }

    /// Create a pipeline that reports progress checkpoints
    pub fn with_progress(
        uploads_dir: PathBuf,
        processed_dir: PathBuf,
        progress_tx: UnboundedSender<ProgressEvent>,
    ) -> Self {
        Self { uploads_dir, processed_dir, progress_tx: Some(progress_tx) }
    }

    /// Run every stage over the input photo
    ///
    /// Synchronous and CPU-bound; callers run it on a blocking thread.
    pub fn process(&self, input: &[u8], style: Style) -> Result<ProcessedImage, PipelineError> {
        let started = Instant::now();
        let id = Uuid::new_v4();

        self.emit("Loading image", 10);
        let original = image::load_from_memory(input)?;

        self.emit("Normalizing image", 20);
        let normalized = original
            .resize_to_fill(TARGET_WIDTH, TARGET_HEIGHT, image::imageops::FilterType::Lanczos3)
            .to_rgb8();

        self.emit("Simplifying background", 35);
        let cleaned = whiten_background(normalized);

        self.emit("Applying style filter", 50);
        let params = params_for(style);
        let styled = styles::apply_style(cleaned, &params);

        self.emit("Enhancing edges", 70);
        let illustration = enhance_edges(&styled, params.edge_strength);

        self.emit("Extracting palette", 85);
        let palette = palette::extract_palette(&original);

        self.emit("Saving outputs", 95);
        let original_name = format!("{}_original.jpg", id);
        let illustration_name = format!("{}_illustration.png", id);
        save_jpeg(&original, &self.uploads_dir.join(&original_name))?;
        save_png(&illustration, &self.processed_dir.join(&illustration_name))?;

        self.emit("Done", 100);

        Ok(ProcessedImage {
            id,
            original_url: format!("/uploads/{}", original_name),
            illustration_url: format!("/processed/{}", illustration_name),
            palette,
            style,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn emit(&self, label: &'static str, percent: u8) {
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(ProgressEvent { label, percent });
        }
    }
}

/// Processing-time estimate from the upload size: 2 seconds per mebibyte,
/// rounded up.
pub fn estimate_processing_time_ms(file_size_bytes: u64) -> u64 {
    let size_mb = file_size_bytes as f64 / (1024.0 * 1024.0);
    (size_mb * 2000.0).ceil() as u64
}

/// Push near-white pixels to pure white
///
/// Luminance thresholding stands in for background removal: studio shots
/// have bright backdrops, and unifying them to white makes the line work
/// read as an illustration.
fn whiten_background(mut image: RgbImage) -> RgbImage {
    for pixel in image.pixels_mut() {
        let [r, g, b] = pixel.0;
        if luma(r, g, b) >= BACKGROUND_LUMA {
            pixel.0 = [255, 255, 255];
        }
    }
    image
}

/// Overlay a high-pass edge map onto the styled image
///
/// The kernel response is computed on a grayscale copy, scaled by the
/// style's strength constant, then composited with a multiplicative blend.
fn enhance_edges(styled: &RgbImage, strength: f32) -> RgbImage {
    let gray = DynamicImage::ImageRgb8(styled.clone()).to_luma8();

    let kernel: Vec<f32> = EDGE_KERNEL.iter().map(|k| k * strength).collect();
    let edges = image::imageops::filter3x3(&gray, &kernel);

    let mut result = styled.clone();
    for (x, y, pixel) in result.enumerate_pixels_mut() {
        let edge = edges.get_pixel(x, y).0[0] as u16;
        for channel in pixel.0.iter_mut() {
            *channel = ((*channel as u16 * edge) / 255) as u8;
        }
    }
    result
}

fn save_jpeg(image: &DynamicImage, path: &std::path::Path) -> Result<(), PipelineError> {
    let file = std::fs::File::create(path).map_err(|e| PipelineError::Persist {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, 90);
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(PipelineError::Encode)
}

fn save_png(image: &RgbImage, path: &std::path::Path) -> Result<(), PipelineError> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(PipelineError::Encode)
}
