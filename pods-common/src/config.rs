//! Bootstrap configuration loading and default path resolution
//!
//! Pods read a small TOML file at startup. A missing file is not fatal:
//! the pod logs a warning and continues with built-in defaults, so that a
//! first run driven purely by command-line flags works.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name used under the platform config/data directories
pub const APP_DIR: &str = "pods";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default configuration file for a pod: `<config_dir>/pods/<pod_name>.toml`
pub fn default_config_path(pod_name: &str) -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(format!("{}.toml", pod_name))
}

/// Default note database: `<data_local_dir>/pods/notes.db`
pub fn default_database_path() -> PathBuf {
    if let Some(dir) = dirs::data_local_dir() {
        dir.join(APP_DIR).join("notes.db")
    } else {
        PathBuf::from("./pods_data/notes.db")
    }
}

/// Load a TOML configuration file
///
/// Missing file → warning + `T::default()`. A file that exists but cannot
/// be read or parsed is a configuration error.
pub fn load_toml_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Pick the first value present, in priority order
///
/// Used for CLI → environment → TOML → default resolution where clap has
/// already merged CLI and environment into a single `Option`.
pub fn first_of<T>(candidates: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    candidates.into_iter().flatten().next()
}
