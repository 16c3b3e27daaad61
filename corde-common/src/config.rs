//! Root folder resolution and TOML configuration loading
//!
//! The root folder holds everything the service writes: the SQLite
//! database, uploaded originals, and processed illustrations.
//!
//! Resolution priority:
//! 1. Environment variable (`CORDE_ROOT`)
//! 2. `root_folder` key in the TOML config file
//! 3. OS-dependent compiled default

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "CORDE_ROOT";

/// Optional TOML configuration file (`~/.config/corde/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data root folder override
    pub root_folder: Option<String>,
    /// HTTP listen port override
    pub port: Option<u16>,
}

/// Resolve the data root folder
pub fn resolve_root_folder() -> PathBuf {
    // Priority 1: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 2: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 3: OS-dependent compiled default
    default_root_folder()
}

/// Load the TOML config file if one exists
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Get the configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("corde").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/corde/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("corde"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/corde"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("corde"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/corde"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("corde"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\corde"))
    } else {
        PathBuf::from("./corde_data")
    }
}

/// Create the root folder and its subdirectories if missing
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    for dir in [root.to_path_buf(), root.join("uploads"), root.join("processed")] {
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Config(format!("Failed to create {}: {}", dir.display(), e)))?;
    }
    Ok(())
}

/// Database file path inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join("corde.db")
}
