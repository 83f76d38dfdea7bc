//! User configuration loaded from config.toml
//!
//! The file lives in the ev-analytics config directory
//! (`~/.config/ev-analytics/config.toml` by default). Every field is
//! optional; a missing file is the same as an empty one.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::task::DEFAULT_MAKES;

/// Base URL of the backend when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "ev-analytics";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine home directory")]
    NoHomeDirectory,
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection settings
    pub api: ApiConfig,
    /// Defaults for new tasks
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL the endpoint paths are joined onto
    pub base_url: String,
    /// Per-request timeout in seconds. Unset means requests wait for the server.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Makes requested when a task is created without explicit `--make` flags
    pub makes: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            makes: DEFAULT_MAKES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `explicit` if given, otherwise from the
    /// resolved config directory.
    ///
    /// Path resolution priority (highest to lowest):
    /// 1. `explicit` (the `--config` flag)
    /// 2. `$EVA_CONFIG_HOME/config.toml`
    /// 3. `$XDG_CONFIG_HOME/ev-analytics/config.toml`
    /// 4. `~/.config/ev-analytics/config.toml`
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => resolve_config_dir()?.join(CONFIG_FILE_NAME),
        };
        Self::load_from(&path)
    }

    /// Load configuration from a specific file, returning defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command line overrides on top of file values
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        self
    }
}

fn resolve_config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = env::var("EVA_CONFIG_HOME") {
        return Ok(PathBuf::from(dir));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join(APP_DIR_NAME));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| ConfigError::NoHomeDirectory)?;

    Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
}
