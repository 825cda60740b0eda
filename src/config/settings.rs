//! Application settings and paths.
//!
//! Settings live in an XDG-compliant config directory and fall back to
//! built-in defaults when no file exists.

use crate::cve::{FeedEndpoints, DEFAULT_MITRE_ENDPOINT, DEFAULT_NVD_ENDPOINT};
use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portcve)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "portcve", "portcve").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default number of probes in flight.
    pub default_concurrency: usize,
    /// Default per-probe timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Largest number of addresses a scan target may span, 0 for unlimited.
    pub max_hosts: u64,
    /// Timeout for a remote CVE feed request in milliseconds.
    pub request_timeout_ms: u64,
    /// Offline CVE catalogue used when no file is given.
    pub cve_data_path: PathBuf,
    /// NVD-style feed endpoint.
    pub nvd_endpoint: String,
    /// MITRE-style feed endpoint.
    pub mitre_endpoint: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_concurrency: 500,
            default_timeout_ms: 3000,
            max_hosts: 65_536,
            request_timeout_ms: 30_000,
            cve_data_path: PathBuf::from("data/cve_data.json"),
            nvd_endpoint: DEFAULT_NVD_ENDPOINT.to_string(),
            mitre_endpoint: DEFAULT_MITRE_ENDPOINT.to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if there is no file.
    pub fn load() -> ConfigResult<Self> {
        let file = match Paths::discover() {
            Ok(paths) => paths.settings_file(),
            Err(ConfigError::DirectoryNotFound) => {
                debug!("no home directory, using default settings");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
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

    /// Write settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFailed {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn feed_endpoints(&self) -> FeedEndpoints {
        FeedEndpoints {
            nvd: self.nvd_endpoint.clone(),
            mitre: self.mitre_endpoint.clone(),
        }
    }
}
