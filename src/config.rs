use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Catalog file looked up in the config directory when none is given
pub const DEFAULT_CATALOG_FILE: &str = "catalog.toml";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Server configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    pub bind: String,
    /// Catalog file loaded at startup
    pub catalog: PathBuf,
    /// Answer browser-style GET queries instead of rejecting them with 403
    pub allow_get: bool,
    /// Write logs to this file instead of stdout
    pub log_file: Option<PathBuf>,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
            catalog: config_dir().join(DEFAULT_CATALOG_FILE),
            allow_get: false,
            log_file: None,
            json_logs: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Load the server configuration from a TOML file.
/// Missing fields fall back to their defaults.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Returns the path to the config directory for version-check.
/// Uses $XDG_CONFIG_HOME/version-check if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/version-check,
/// or ./version-check if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("version-check")
}
