//! Service configuration
//!
//! Listen port resolves env → TOML → compiled default; the data root
//! folder comes from `corde_common::config`.

use std::path::PathBuf;

/// Environment variable naming the listen port
pub const PORT_ENV: &str = "CORDE_PORT";

/// Compiled default listen port
pub const DEFAULT_PORT: u16 = 4568;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub root_folder: PathBuf,
}

impl ServerConfig {
    /// Resolve configuration from the environment and config file
    pub fn load() -> Self {
        let port = std::env::var(PORT_ENV)
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .or_else(|| {
                corde_common::config::load_toml_config()
                    .ok()
                    .and_then(|config| config.port)
            })
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            root_folder: corde_common::config::resolve_root_folder(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_used_without_overrides() {
        // The env var is absent in the test environment unless a developer
        // exports it; guard against that rather than mutating process env.
        if std::env::var(PORT_ENV).is_err() {
            let config = ServerConfig::load();
            assert!(config.port > 0);
        }
    }
}
