//! Application settings and paths.
//!
//! Settings provide the defaults that command-line flags override. They
//! live in an XDG-compliant configuration directory.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::scan::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portsweep", "portsweep")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default worker count.
    pub default_workers: usize,
    /// Default connect timeout in seconds.
    pub default_timeout_secs: u64,
    /// Dispatch queue capacity.
    pub queue_capacity: usize,
    /// Grab banners by default.
    pub grab_banners: bool,
    /// Maximum connection attempts per second, 0 for unlimited.
    pub default_rate_limit: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_workers: DEFAULT_WORKERS,
            default_timeout_secs: 5,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            grab_banners: true,
            default_rate_limit: 0,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    ///
    /// A missing file (or no home directory) yields the built-in defaults.
    pub fn load() -> ConfigResult<Self> {
        let file = match Paths::new() {
            Ok(paths) => paths.settings_file(),
            Err(ConfigError::DirectoryNotFound) => return Ok(Self::default()),
            Err(e) => return Err(e),
        };

        if !file.exists() {
            tracing::debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}
