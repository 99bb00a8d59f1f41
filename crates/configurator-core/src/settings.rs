//! Runtime settings.
//!
//! Settings come from an optional TOML file. Every key has a default, so an
//! empty file (or no file at all) yields a working configuration for a stock
//! appliance.
//!
//! ```
//! use configurator_core::Settings;
//!
//! let settings: Settings = "hat_read_attempts = 5\ndsp_port = 9000".parse().unwrap();
//! assert_eq!(settings.hat_read_attempts, 5);
//! assert_eq!(settings.dsp_port, 9000);
//! assert_eq!(settings.i2c_bus, 1);
//! ```

use crate::constants::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Configurator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Boot configuration file managed by the tooling.
    pub boot_config: PathBuf,

    /// Sentinel file written when a reboot is required.
    pub reboot_file: PathBuf,

    /// Optional file receiving one timestamped line per configuration change.
    pub event_log: Option<PathBuf>,

    /// HAT EEPROM read attempts (one second apart).
    pub hat_read_attempts: u32,

    /// I2C bus probed for sound-card chips.
    pub i2c_bus: u8,

    /// DSP detection service host.
    pub dsp_host: String,

    /// DSP detection service port.
    pub dsp_port: u16,

    /// DSP detection request timeout in milliseconds.
    pub dsp_timeout_ms: u64,

    /// Timeout for external commands in milliseconds.
    pub command_timeout_ms: u64,

    /// Write `force_eeprom_read=0` after configuring a detected card.
    pub disable_eeprom_after_configure: bool,

    /// Profile applied when detection finds nothing and a fallback is requested.
    pub fallback_profile: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            boot_config: PathBuf::from(DEFAULT_BOOT_CONFIG),
            reboot_file: PathBuf::from(DEFAULT_REBOOT_FILE),
            event_log: None,
            hat_read_attempts: DEFAULT_HAT_READ_ATTEMPTS,
            i2c_bus: DEFAULT_I2C_BUS,
            dsp_host: DEFAULT_DSP_HOST.to_string(),
            dsp_port: DEFAULT_DSP_PORT,
            dsp_timeout_ms: DEFAULT_DSP_TIMEOUT_MS,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            disable_eeprom_after_configure: false,
            fallback_profile: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!("Loaded settings from {}", path.display());
        content.parse()
    }

    /// Load settings from `path` when given, otherwise from the default
    /// location if it exists, otherwise use defaults.
    ///
    /// An explicitly given path must exist.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_SETTINGS_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Base URL of the DSP detection service.
    pub fn dsp_base_url(&self) -> String {
        format!("http://{}:{}", self.dsp_host, self.dsp_port)
    }

    /// DSP request timeout.
    pub fn dsp_timeout(&self) -> Duration {
        Duration::from_millis(self.dsp_timeout_ms)
    }

    /// External command timeout.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

impl FromStr for Settings {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Settings(e.to_string()))
    }
}
