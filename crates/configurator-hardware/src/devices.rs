//! Enum wrappers for collaborator dispatch.
//!
//! Native `async fn` in traits (RPITIT - Rust Edition 2024) are not
//! object-safe, so we cannot use `Box<dyn HatReader>`. Instead each trait has
//! an `Any*` enum with one variant per implementation, giving concrete type
//! dispatch at compile time.
//!
//! [`Peripherals`] bundles one of each so the detector can be built either
//! from the real system or from mocks:
//!
//! ```
//! use configurator_hardware::devices::Peripherals;
//! use configurator_hardware::mock::{MockAudioDevices, MockHatReader};
//!
//! let peripherals = Peripherals::mock()
//!     .with_hat(MockHatReader::with_product("DAC2 Pro"))
//!     .with_audio(MockAudioDevices::empty());
//! ```

use crate::mock::{
    MockAudioDevices, MockDspService, MockHatReader, MockI2cBus, MockMixerControls,
    MockSystemControl,
};
use crate::system::{
    AmixerControls, AplayDevices, CommandSystemControl, HttpDspService, I2cToolsBus,
    SysfsHatReader,
};
use crate::traits::{AudioDevices, DspService, HatReader, I2cBus, MixerControls, SystemControl};
use crate::types::{DspInfo, HatInfo, PlaybackDevices};
use crate::Result;
use configurator_core::Settings;

/// Enum wrapper for HAT reader dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyHatReader {
    /// Mock reader for development and testing.
    Mock(MockHatReader),

    /// Device-tree reader.
    Sysfs(SysfsHatReader),
}

impl HatReader for AnyHatReader {
    async fn read_hat_info(&self) -> HatInfo {
        match self {
            Self::Mock(reader) => reader.read_hat_info().await,
            Self::Sysfs(reader) => reader.read_hat_info().await,
        }
    }
}

/// Enum wrapper for I2C bus dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyI2cBus {
    /// Mock bus for development and testing.
    Mock(MockI2cBus),

    /// `i2c-tools` backed bus.
    I2cTools(I2cToolsBus),
}

impl I2cBus for AnyI2cBus {
    async fn read_register(&self, bus: u8, address: u8, register: u8) -> Result<u8> {
        match self {
            Self::Mock(device) => device.read_register(bus, address, register).await,
            Self::I2cTools(device) => device.read_register(bus, address, register).await,
        }
    }
}

/// Enum wrapper for playback-device enumerator dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyAudioDevices {
    /// Mock enumerator for development and testing.
    Mock(MockAudioDevices),

    /// `aplay -l` backed enumerator.
    Aplay(AplayDevices),
}

impl AudioDevices for AnyAudioDevices {
    async fn playback_devices(&self) -> Result<PlaybackDevices> {
        match self {
            Self::Mock(devices) => devices.playback_devices().await,
            Self::Aplay(devices) => devices.playback_devices().await,
        }
    }
}

/// Enum wrapper for mixer enumerator dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyMixerControls {
    /// Mock enumerator for development and testing.
    Mock(MockMixerControls),

    /// `amixer` backed enumerator.
    Amixer(AmixerControls),
}

impl MixerControls for AnyMixerControls {
    async fn control_names(&self, card_index: u32) -> Result<Vec<String>> {
        match self {
            Self::Mock(mixer) => mixer.control_names(card_index).await,
            Self::Amixer(mixer) => mixer.control_names(card_index).await,
        }
    }
}

/// Enum wrapper for DSP service dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyDspService {
    /// Mock service for development and testing.
    Mock(MockDspService),

    /// HTTP client of the local service.
    Http(HttpDspService),
}

impl DspService for AnyDspService {
    async fn detect_dsp(&self) -> Option<DspInfo> {
        match self {
            Self::Mock(service) => service.detect_dsp().await,
            Self::Http(service) => service.detect_dsp().await,
        }
    }
}

/// Enum wrapper for system control dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnySystemControl {
    /// Mock control for development and testing.
    Mock(MockSystemControl),

    /// Command backed control.
    Command(CommandSystemControl),
}

impl SystemControl for AnySystemControl {
    async fn load_overlay(&self, name: &str, params: &[&str]) -> Result<()> {
        match self {
            Self::Mock(control) => control.load_overlay(name, params).await,
            Self::Command(control) => control.load_overlay(name, params).await,
        }
    }

    async fn reboot(&self) -> Result<()> {
        match self {
            Self::Mock(control) => control.reboot().await,
            Self::Command(control) => control.reboot().await,
        }
    }
}

/// One implementation of every collaborator.
#[derive(Debug, Clone)]
pub struct Peripherals {
    /// HAT EEPROM reader.
    pub hat: AnyHatReader,

    /// I2C bus.
    pub i2c: AnyI2cBus,

    /// Playback-device enumerator.
    pub audio: AnyAudioDevices,

    /// Mixer enumerator.
    pub mixer: AnyMixerControls,

    /// DSP detection service.
    pub dsp: AnyDspService,

    /// Overlay loader and reboot trigger.
    pub system: AnySystemControl,
}

impl Peripherals {
    /// Real implementations configured from `settings`.
    pub fn system(settings: &Settings) -> Self {
        let timeout = settings.command_timeout();
        Self {
            hat: AnyHatReader::Sysfs(SysfsHatReader::new()),
            i2c: AnyI2cBus::I2cTools(I2cToolsBus::new(timeout)),
            audio: AnyAudioDevices::Aplay(AplayDevices::new(timeout)),
            mixer: AnyMixerControls::Amixer(AmixerControls::new(timeout)),
            dsp: AnyDspService::Http(HttpDspService::new(
                &settings.dsp_base_url(),
                settings.dsp_timeout(),
            )),
            system: AnySystemControl::Command(CommandSystemControl::new(timeout)),
        }
    }

    /// Mocks in their "nothing attached" state.
    pub fn mock() -> Self {
        Self {
            hat: AnyHatReader::Mock(MockHatReader::absent()),
            i2c: AnyI2cBus::Mock(MockI2cBus::new()),
            audio: AnyAudioDevices::Mock(MockAudioDevices::empty()),
            mixer: AnyMixerControls::Mock(MockMixerControls::new()),
            dsp: AnyDspService::Mock(MockDspService::unavailable()),
            system: AnySystemControl::Mock(MockSystemControl::new()),
        }
    }

    /// Replace the HAT reader.
    pub fn with_hat(mut self, hat: MockHatReader) -> Self {
        self.hat = AnyHatReader::Mock(hat);
        self
    }

    /// Replace the I2C bus.
    pub fn with_i2c(mut self, i2c: MockI2cBus) -> Self {
        self.i2c = AnyI2cBus::Mock(i2c);
        self
    }

    /// Replace the playback-device enumerator.
    pub fn with_audio(mut self, audio: MockAudioDevices) -> Self {
        self.audio = AnyAudioDevices::Mock(audio);
        self
    }

    /// Replace the mixer enumerator.
    pub fn with_mixer(mut self, mixer: MockMixerControls) -> Self {
        self.mixer = AnyMixerControls::Mock(mixer);
        self
    }

    /// Replace the DSP service.
    pub fn with_dsp(mut self, dsp: MockDspService) -> Self {
        self.dsp = AnyDspService::Mock(dsp);
        self
    }

    /// Replace the system control.
    pub fn with_system(mut self, system: MockSystemControl) -> Self {
        self.system = AnySystemControl::Mock(system);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_peripherals_report_nothing() {
        let peripherals = Peripherals::mock();

        assert!(!peripherals.hat.read_hat_info().await.has_product());
        assert!(peripherals.i2c.read_register(1, 0x4a, 25).await.is_err());
        assert!(!peripherals.audio.playback_devices().await.unwrap().has_hifiberry());
        assert!(peripherals.dsp.detect_dsp().await.is_none());
    }

    #[tokio::test]
    async fn test_any_wrappers_dispatch_to_mock() {
        let hat = MockHatReader::with_product("Amp3");
        let calls = hat.calls();
        let peripherals = Peripherals::mock().with_hat(hat);

        let info = peripherals.hat.read_hat_info().await;
        assert_eq!(info.product(), Some("Amp3"));
        assert_eq!(calls.count(), 1);
    }

    #[test]
    fn test_system_peripherals_use_real_implementations() {
        let peripherals = Peripherals::system(&Settings::default());
        assert!(matches!(peripherals.hat, AnyHatReader::Sysfs(_)));
        assert!(matches!(peripherals.dsp, AnyDspService::Http(_)));
        assert!(matches!(peripherals.system, AnySystemControl::Command(_)));
    }
}
