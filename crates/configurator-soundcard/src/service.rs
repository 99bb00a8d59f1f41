//! Sound-card operations exposed to the command line.
//!
//! [`SoundcardService`] owns the boot configuration buffer, the detector and
//! the writer, and combines them into the operations an operator runs:
//! detect the card, configure it, or both in one step with an optional
//! fallback profile.

use crate::bootconfig::BootConfigFile;
use crate::catalog::CardProfile;
use crate::detector::{CardIdentifier, DetectorOptions};
use crate::result::{DetectionResult, DetectionSource};
use crate::writer::{BootConfigWriter, ConfigureOutcome};
use configurator_core::{Error, Result, Settings};
use configurator_hardware::devices::Peripherals;
use serde::Serialize;
use tracing::{info, warn};

/// Properties of the current card, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardInfo {
    pub name: String,
    #[serde(rename = "dtoverlay")]
    pub overlay: Option<String>,
    pub source: DetectionSource,
    pub volume_control: Option<String>,
    pub headphone_volume_control: Option<String>,
    pub hardware_index: Option<u32>,
    pub output_channels: u8,
    pub input_channels: u8,
    pub features: Vec<String>,
    pub hat_name: Option<String>,
    pub supports_dsp: bool,
    pub card_type: Vec<String>,
    pub is_pro: bool,
}

impl CardInfo {
    fn from_profile(
        result: &DetectionResult,
        profile: &CardProfile,
        hardware_index: Option<u32>,
        use_softvol_fallback: bool,
    ) -> Self {
        Self {
            name: result.display_name().to_string(),
            overlay: result.overlay().map(str::to_string),
            source: result.source(),
            volume_control: profile
                .mixer_control_name(use_softvol_fallback)
                .map(str::to_string),
            headphone_volume_control: profile.headphone_volume_control.map(str::to_string),
            hardware_index,
            output_channels: profile.output_channels,
            input_channels: profile.input_channels,
            features: to_strings(profile.features),
            hat_name: profile.hat_name.map(str::to_string),
            supports_dsp: profile.supports_dsp,
            card_type: to_strings(profile.card_type),
            is_pro: profile.is_pro,
        }
    }

    fn unknown(
        result: &DetectionResult,
        hardware_index: Option<u32>,
        use_softvol_fallback: bool,
    ) -> Self {
        Self {
            name: result.display_name().to_string(),
            overlay: result.overlay().map(str::to_string),
            source: result.source(),
            volume_control: use_softvol_fallback.then(|| "Softvol".to_string()),
            headphone_volume_control: None,
            hardware_index,
            output_channels: 2,
            input_channels: 0,
            features: Vec::new(),
            hat_name: None,
            supports_dsp: false,
            card_type: Vec::new(),
            is_pro: false,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Detection and configuration against one boot configuration file.
#[derive(Debug)]
pub struct SoundcardService {
    config: BootConfigFile,
    identifier: CardIdentifier,
    writer: BootConfigWriter,
}

impl SoundcardService {
    pub fn new(config: BootConfigFile, identifier: CardIdentifier, writer: BootConfigWriter) -> Self {
        Self {
            config,
            identifier,
            writer,
        }
    }

    /// Load the configured boot file and wire the service from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigFileNotFound`] if the boot configuration does
    /// not exist.
    pub fn from_settings(settings: &Settings, peripherals: Peripherals) -> Result<Self> {
        let config = BootConfigFile::load(&settings.boot_config)?;
        let identifier = CardIdentifier::new(peripherals, DetectorOptions::from_settings(settings));
        Ok(Self::new(config, identifier, BootConfigWriter::from_settings(settings)))
    }

    pub fn config(&self) -> &BootConfigFile {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut BootConfigFile {
        &mut self.config
    }

    pub fn identifier(&self) -> &CardIdentifier {
        &self.identifier
    }

    /// Run the detection chain.
    pub async fn detect_card(&mut self) -> Result<DetectionResult> {
        self.identifier.detect(&mut self.config).await
    }

    /// Card comment first, then the detection chain without the I2C probe.
    ///
    /// Leaves the boot configuration untouched.
    pub async fn identify_current_card(&self) -> DetectionResult {
        self.identifier.identify_current_card(&self.config).await
    }

    /// Write `result` to the boot configuration, optionally loading the
    /// overlay now and rebooting if the overlay changed.
    pub async fn configure_detected_card(
        &mut self,
        result: &DetectionResult,
        load_immediately: bool,
        reboot_if_changed: bool,
    ) -> Result<ConfigureOutcome> {
        self.writer
            .configure(
                &mut self.config,
                result,
                &self.identifier.peripherals().system,
                load_immediately,
                reboot_if_changed,
            )
            .await
    }

    /// Detect the card, fall back to `fallback_profile` if nothing was found,
    /// and configure the result when `store` is set.
    ///
    /// When the boot configuration carries the detection-disabled marker
    /// nothing is probed or written; the card named in the config comment is
    /// reported if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProfile`] if a fallback is needed and names no
    /// catalog profile, and propagates boot configuration I/O errors.
    pub async fn detect_and_configure(
        &mut self,
        store: bool,
        fallback_profile: Option<&str>,
        load_immediately: bool,
        reboot_if_changed: bool,
    ) -> Result<DetectionResult> {
        if self.config.is_detection_disabled() {
            info!(
                "Sound card detection disabled in {}",
                self.config.path().display()
            );
            let current = self.identifier.identify_from_config_comment(&self.config).await;
            return Ok(current.unwrap_or_else(DetectionResult::none));
        }

        let mut result = self.detect_card().await?;

        if !result.is_detected()
            && let Some(fallback) = fallback_profile
        {
            result = self.fallback(fallback)?;
            warn!("No sound card detected, using fallback {}", fallback);
        }

        if store {
            self.configure_detected_card(&result, load_immediately, reboot_if_changed)
                .await?;
        } else {
            info!("Detected card: {}", result.display_name());
        }

        Ok(result)
    }

    fn fallback(&self, name: &str) -> Result<DetectionResult> {
        let profile = self
            .identifier
            .catalog()
            .resolve(name)
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))?;
        let overlay = profile
            .overlay
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))?;
        Ok(DetectionResult::detected(
            overlay,
            profile.name,
            DetectionSource::Fallback,
        ))
    }

    /// Describe the current card. Read-only, like [`Self::identify_current_card`].
    pub async fn card_info(&self, use_softvol_fallback: bool) -> CardInfo {
        let result = self.identify_current_card().await;
        let hardware_index = self.identifier.hardware_index().await;

        let profile = result
            .name()
            .and_then(|name| self.identifier.catalog().resolve(name));
        match profile {
            Some(profile) => {
                CardInfo::from_profile(&result, profile, hardware_index, use_softvol_fallback)
            }
            None => CardInfo::unknown(&result, hardware_index, use_softvol_fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_hardware::mock::{MockAudioDevices, MockHatReader};
    use std::fs;
    use tempfile::TempDir;

    fn service(content: &str, peripherals: Peripherals) -> (TempDir, SoundcardService) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, content).unwrap();
        let settings = Settings {
            boot_config: path,
            reboot_file: dir.path().join("reboot"),
            ..Settings::default()
        };
        let service = SoundcardService::from_settings(&settings, peripherals).unwrap();
        (dir, service)
    }

    #[test]
    fn test_from_settings_missing_config() {
        let settings = Settings {
            boot_config: "/nonexistent/config.txt".into(),
            ..Settings::default()
        };
        let err = SoundcardService::from_settings(&settings, Peripherals::mock()).unwrap_err();
        assert!(matches!(err, Error::ConfigFileNotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_fallback_is_an_error() {
        let (_dir, mut service) = service("", Peripherals::mock());

        let err = service
            .detect_and_configure(false, Some("No Such Card"), false, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownProfile(name) if name == "No Such Card"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_not_used_when_detected() {
        let peripherals = Peripherals::mock().with_hat(MockHatReader::with_product("Amp4 Pro"));
        let (_dir, mut service) = service("", peripherals);

        let result = service
            .detect_and_configure(false, Some("DAC+ Light"), false, false)
            .await
            .unwrap();
        assert_eq!(result.name(), Some("Amp4 Pro"));
        assert_eq!(result.source(), DetectionSource::HatEeprom);
    }

    #[tokio::test]
    async fn test_detection_disabled_marker_skips_everything() {
        let hat = MockHatReader::with_product("Amp4 Pro");
        let calls = hat.calls();
        let (_dir, mut service) = service(
            "# configurator: disable soundcard detection\ndtoverlay=hifiberry-dac\n",
            Peripherals::mock().with_hat(hat),
        );

        let result = service
            .detect_and_configure(true, Some("DAC+ Light"), false, false)
            .await
            .unwrap();

        assert!(!result.is_detected());
        assert_eq!(calls.count(), 0);
        assert!(!service.config().is_modified());
    }

    #[tokio::test]
    async fn test_card_info_from_config_comment() {
        let audio = MockAudioDevices::new(
            "card 3: sndrpihifiberry [snd_rpi_hifiberry_dacplus], device 0: HiFiBerry DAC+ HiFi",
        );
        let (_dir, service) = service(
            "# HiFiBerry card: DAC+/Amp2\ndtoverlay=hifiberry-dacplus-std\n",
            Peripherals::mock().with_audio(audio),
        );

        let info = service.card_info(false).await;

        assert_eq!(info.name, "DAC+/Amp2");
        assert_eq!(info.source, DetectionSource::ConfigComment);
        assert_eq!(info.volume_control.as_deref(), Some("Digital"));
        assert_eq!(info.hardware_index, Some(3));
        assert_eq!(info.output_channels, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_card_info_unknown_card() {
        let (_dir, service) = service("", Peripherals::mock());

        let info = service.card_info(true).await;

        assert_eq!(info.name, "Unknown");
        assert_eq!(info.source, DetectionSource::None);
        assert_eq!(info.volume_control.as_deref(), Some("Softvol"));
        assert_eq!(info.hardware_index, None);
    }
}
