//! Applying a detection result to the boot configuration.

use crate::bootconfig::BootConfigFile;
use crate::catalog::{overlay_base, overlay_params};
use crate::result::DetectionResult;
use chrono::Utc;
use configurator_core::constants::{HIFIBERRY_OVERLAY_LINE_PREFIX, HIFIBERRY_OVERLAY_PREFIX};
use configurator_core::{Result, Settings};
use configurator_hardware::SystemControl;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// What [`BootConfigWriter::configure`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigureOutcome {
    /// The HiFiBerry overlay line was replaced or added.
    pub overlay_changed: bool,

    /// The boot configuration file was written.
    pub file_written: bool,

    /// The overlay was loaded into the running kernel.
    pub overlay_loaded: bool,

    /// A reboot was triggered.
    pub reboot_triggered: bool,
}

/// Makes the boot configuration match a [`DetectionResult`].
///
/// The configuration is changed in three ways at most: the HiFiBerry overlay
/// line, the card comment above it and, optionally, EEPROM force-read. When
/// the overlay changes, a reboot sentinel file is written and an event is
/// appended to the optional event log.
#[derive(Debug, Clone)]
pub struct BootConfigWriter {
    reboot_file: PathBuf,
    event_log: Option<PathBuf>,
    disable_eeprom: bool,
}

impl BootConfigWriter {
    pub fn new(reboot_file: impl Into<PathBuf>) -> Self {
        Self {
            reboot_file: reboot_file.into(),
            event_log: None,
            disable_eeprom: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            reboot_file: settings.reboot_file.clone(),
            event_log: settings.event_log.clone(),
            disable_eeprom: settings.disable_eeprom_after_configure,
        }
    }

    /// Append one line per configuration change to `path`.
    pub fn with_event_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.event_log = Some(path.into());
        self
    }

    /// Write `force_eeprom_read=0` along with a new overlay.
    pub fn with_disable_eeprom(mut self, disable: bool) -> Self {
        self.disable_eeprom = disable;
        self
    }

    pub fn reboot_file(&self) -> &Path {
        &self.reboot_file
    }

    /// Update the overlay line and card comment, then save.
    ///
    /// A result without a detection is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration, the sentinel or the event log
    /// cannot be written.
    pub fn apply(
        &self,
        config: &mut BootConfigFile,
        result: &DetectionResult,
    ) -> Result<ConfigureOutcome> {
        let (Some(overlay), Some(name)) = (result.overlay(), result.name()) else {
            error!("No sound card detected to configure");
            return Ok(ConfigureOutcome::default());
        };

        let overlay_line = format!("{}{}", HIFIBERRY_OVERLAY_LINE_PREFIX, overlay);

        if config.hifiberry_overlay_lines().contains(&overlay_line.as_str()) {
            info!("{} already configured, refreshing card comment", name);
            config.set_card_comment(&overlay_line, name);
            let file_written = config.save()?;
            return Ok(ConfigureOutcome {
                file_written,
                ..ConfigureOutcome::default()
            });
        }

        info!("Configuring card {} ({})", name, overlay_line);
        config.remove_overlays_matching_prefix(HIFIBERRY_OVERLAY_PREFIX);
        config.remove_card_comments();
        config.enable_overlay(&format!("{}-{}", HIFIBERRY_OVERLAY_PREFIX, overlay), Some(name));
        if self.disable_eeprom {
            config.set_eeprom_read(false);
        }
        let file_written = config.save()?;

        self.mark_reboot_required(name)?;
        self.log_event(result, &overlay_line)?;

        Ok(ConfigureOutcome {
            overlay_changed: true,
            file_written,
            ..ConfigureOutcome::default()
        })
    }

    /// [`apply`](Self::apply), then optionally load the overlay and reboot.
    ///
    /// A failing overlay load is logged; the boot configuration still takes
    /// effect on the next boot. The reboot only happens when the overlay
    /// line changed.
    ///
    /// # Errors
    ///
    /// Returns an error if [`apply`](Self::apply) fails or the reboot command
    /// cannot be run.
    pub async fn configure<S: SystemControl>(
        &self,
        config: &mut BootConfigFile,
        result: &DetectionResult,
        system: &S,
        load_immediately: bool,
        reboot_if_changed: bool,
    ) -> Result<ConfigureOutcome> {
        let mut outcome = self.apply(config, result)?;
        let Some(overlay) = result.overlay() else {
            return Ok(outcome);
        };

        if load_immediately {
            let name = format!("{}-{}", HIFIBERRY_OVERLAY_PREFIX, overlay_base(overlay));
            let params = overlay_params(overlay);
            match system.load_overlay(&name, &params).await {
                Ok(()) => {
                    info!("Loaded overlay {}", name);
                    outcome.overlay_loaded = true;
                }
                Err(e) => warn!("Failed to load overlay {}: {}", name, e),
            }
        }

        if reboot_if_changed && outcome.overlay_changed {
            info!("Boot configuration changed, rebooting");
            system.reboot().await?;
            outcome.reboot_triggered = true;
        }

        Ok(outcome)
    }

    fn mark_reboot_required(&self, name: &str) -> Result<()> {
        fs::write(
            &self.reboot_file,
            format!("Configuring {} requires a reboot.\n", name),
        )?;
        info!("Reboot required, marked in {}", self.reboot_file.display());
        Ok(())
    }

    fn log_event(&self, result: &DetectionResult, overlay_line: &str) -> Result<()> {
        let Some(path) = &self.event_log else {
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(
            file,
            "{} configured {} ({}, detected via {})",
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            result.display_name(),
            overlay_line,
            result.source()
        )?;
        Ok(())
    }
}
