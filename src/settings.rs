//! Application settings
//!
//! Where to find the binding file, which device slot to watch and how often to poll.
//! Stored as TOML; every field is optional and falls back to its default, and a
//! missing file means all defaults.
//!
//! ```toml
//! bindings_path = "bindings.yay"
//! slot = 0
//! connected_poll_ms = 1
//! disconnected_poll_ms = 1000
//! log_level = "info"
//! ```

use crate::controller::PollSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const SETTINGS_DIR: &str = "yaypad";
const SETTINGS_FILE: &str = "settings.toml";
const DEFAULT_BINDINGS_FILE: &str = "bindings.yay";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Binding file, relative paths resolve against the working directory
    pub bindings_path: PathBuf,
    /// Device slot to watch
    pub slot: usize,
    pub connected_poll_ms: u64,
    pub disconnected_poll_ms: u64,
    /// Filter used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bindings_path: PathBuf::from(DEFAULT_BINDINGS_FILE),
            slot: 0,
            connected_poll_ms: 1,
            disconnected_poll_ms: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl AppSettings {
    /// `<config dir>/yaypad/settings.toml`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(SETTINGS_DIR);
        path.push(SETTINGS_FILE);
        path
    }

    /// Loads settings from `path`, using defaults when the file does not exist
    pub async fn load(path: &Path) -> Result<Self, SettingsError> {
        match Self::load_if_present(path).await? {
            Some(settings) => Ok(settings),
            None => {
                info!("No settings file at {:?}, using defaults", path);
                Ok(Self::default())
            }
        }
    }

    /// Loads settings from `path`, `None` when the file does not exist
    pub async fn load_if_present(path: &Path) -> Result<Option<Self>, SettingsError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if !exists {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let settings = Self::from_toml(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(Some(settings))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.connected_poll_ms == 0 {
            return Err(SettingsError::Invalid(
                "connected_poll_ms must be at least 1".to_string(),
            ));
        }
        if self.disconnected_poll_ms == 0 {
            return Err(SettingsError::Invalid(
                "disconnected_poll_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            slot: self.slot,
            connected_interval: Duration::from_millis(self.connected_poll_ms),
            disconnected_interval: Duration::from_millis(self.disconnected_poll_ms),
        }
    }
}
