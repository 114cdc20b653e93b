//! Settings file and CLI override handling.
//!
//! Settings come from three layers, later layers winning:
//! 1. Built-in defaults (`ws://localhost:3000/ws`, 3000ms)
//! 2. `$XDG_CONFIG_HOME/lrm/config.toml`, or the file passed with `--config`
//! 3. Command-line flags
//!
//! ```toml
//! endpoint = "ws://localhost:3000/ws"
//! reconnect_delay_ms = 3000
//! on_reload = "notify-send 'page reloaded'"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lrm_protocol::Endpoint;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TuiError};
use crate::monitor::{MonitorConfig, DEFAULT_RECONNECT_DELAY};

/// One layer of settings. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Socket URL of the dev server.
    pub endpoint: Option<Endpoint>,

    /// Delay before reconnecting after an unexpected close.
    pub reconnect_delay_ms: Option<u64>,

    /// Shell command run on every reload.
    pub on_reload: Option<String>,
}

impl Settings {
    /// Returns the default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lrm").join("config.toml"))
    }

    /// Reads and parses a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TuiError::SettingsFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content).map_err(|reason| TuiError::SettingsFile {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Reads the default settings file. A missing file yields empty settings.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_or_default(&path),
            None => {
                debug!("No config directory, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reads `path` if it exists, otherwise returns empty settings.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::metadata(path) {
            Ok(_) => Self::load(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using built-in defaults");
                Ok(Self::default())
            }
            Err(e) => Err(TuiError::SettingsFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// Parses settings from TOML text.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Layers `overrides` on top of `self`.
    #[must_use]
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            endpoint: overrides.endpoint.or(self.endpoint),
            reconnect_delay_ms: overrides.reconnect_delay_ms.or(self.reconnect_delay_ms),
            on_reload: overrides.on_reload.or(self.on_reload),
        }
    }

    /// Builds the monitor configuration, filling gaps with defaults.
    pub fn monitor_config(&self) -> Result<MonitorConfig> {
        let reconnect_delay = match self.reconnect_delay_ms {
            Some(0) => {
                return Err(TuiError::Config(
                    "reconnect_delay_ms must be greater than zero".to_string(),
                ))
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_RECONNECT_DELAY,
        };

        Ok(MonitorConfig {
            endpoint: self.endpoint.clone().unwrap_or_default(),
            reconnect_delay,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
