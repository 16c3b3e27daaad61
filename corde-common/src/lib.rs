//! Shared plumbing for the corde service crates.
//!
//! Holds the common error type and the root-folder/configuration
//! resolution used at startup.

pub mod config;
pub mod error;

pub use error::{Error, Result};
