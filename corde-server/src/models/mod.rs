//! Data models for corde-server

pub mod job;
pub mod palette;

pub use job::{JobStatus, ProcessingJob, Style};
pub use palette::{CuratedPair, PaletteCode, PaletteItem, RgbTriple, SwatchRole};
