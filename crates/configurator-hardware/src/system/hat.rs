//! HAT EEPROM reader backed by the device tree.
//!
//! The firmware copies the HAT EEPROM into `/proc/device-tree/hat/`, one file
//! per field. Values are NUL-terminated strings.

use crate::traits::HatReader;
use crate::types::HatInfo;
use configurator_core::constants::HAT_SYSFS_DIR;
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

/// HAT reader using the device-tree `hat` node.
#[derive(Debug, Clone)]
pub struct SysfsHatReader {
    dir: PathBuf,
}

impl SysfsHatReader {
    /// Reader for the standard device-tree location.
    pub fn new() -> Self {
        Self::with_dir(HAT_SYSFS_DIR)
    }

    /// Reader for a custom directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_field(&self, name: &str) -> Option<String> {
        let path = self.dir.join(name);
        let bytes = tokio::fs::read(&path).await.ok()?;
        normalize_field(&bytes)
    }
}

impl Default for SysfsHatReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip NULs and whitespace; treat empty and `Unknown` values as absent.
fn normalize_field(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let value = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if value.is_empty() || value.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(value.to_string())
    }
}

impl HatReader for SysfsHatReader {
    async fn read_hat_info(&self) -> HatInfo {
        let is_dir = tokio::fs::metadata(&self.dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            debug!("No HAT node at {}", self.dir.display());
            return HatInfo::empty();
        }

        let uuid = match self.read_field("uuid").await {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(uuid) => Some(uuid),
                Err(e) => {
                    warn!("Ignoring malformed HAT UUID '{}': {}", raw, e);
                    None
                }
            },
            None => None,
        };

        HatInfo {
            vendor: self.read_field("vendor").await,
            product: self.read_field("product").await,
            uuid,
        }
    }
}
