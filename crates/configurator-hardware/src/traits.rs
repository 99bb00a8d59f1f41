//! Collaborator trait definitions.
//!
//! This module defines the interfaces the sound-card detector uses to look at
//! the hardware: the HAT EEPROM, the I2C bus, the ALSA device and mixer
//! listings, the DSP detection service, and the system commands that load
//! overlays and reboot. Each trait has a mock implementation (see
//! [`mock`](crate::mock)) and a Linux implementation (see
//! [`system`](crate::system)).
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.
//!
//! # Object Safety and Dynamic Dispatch
//!
//! These traits are NOT object-safe because `async fn` methods return
//! `impl Future`. Use generic parameters, or the enum wrappers from the
//! [`devices`](crate::devices) module:
//!
//! ```no_run
//! use configurator_hardware::devices::AnyHatReader;
//! use configurator_hardware::mock::MockHatReader;
//! use configurator_hardware::traits::HatReader;
//!
//! # async fn example() {
//! let reader = AnyHatReader::Mock(MockHatReader::with_product("DAC2 Pro"));
//! let info = reader.read_hat_info().await;
//! assert_eq!(info.product(), Some("DAC2 Pro"));
//! # }
//! ```

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{DspInfo, HatInfo, PlaybackDevices};

/// Reader for the HAT identity EEPROM.
pub trait HatReader: Send + Sync {
    /// Read the HAT identity.
    ///
    /// Never fails: an absent or unreadable EEPROM yields
    /// [`HatInfo::empty`]. Callers retry when the product is missing, since
    /// the EEPROM may not be readable immediately after boot.
    async fn read_hat_info(&self) -> HatInfo;
}

/// Byte-level access to an I2C bus.
pub trait I2cBus: Send + Sync {
    /// Read one register of the device at `address` on `bus`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No device answers at the address
    /// - The bus is not enabled
    /// - The operation times out
    async fn read_register(&self, bus: u8, address: u8, register: u8) -> Result<u8>;
}

/// Enumerator of the loaded ALSA playback devices.
pub trait AudioDevices: Send + Sync {
    /// List the playback devices.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing command cannot be run.
    async fn playback_devices(&self) -> Result<PlaybackDevices>;
}

/// Enumerator of the mixer controls of one ALSA card.
pub trait MixerControls: Send + Sync {
    /// Names of the simple mixer controls of card `card_index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the card does not exist or the command fails.
    async fn control_names(&self, card_index: u32) -> Result<Vec<String>>;
}

/// Client of the local DSP detection service.
pub trait DspService: Send + Sync {
    /// Ask the service which DSP is attached.
    ///
    /// Returns `None` when the service is unreachable, times out or answers
    /// with something unusable. Unavailability is not an error.
    async fn detect_dsp(&self) -> Option<DspInfo>;
}

/// System-level actions triggered after configuration.
pub trait SystemControl: Send + Sync {
    /// Load a device-tree overlay into the running kernel.
    ///
    /// Loading an overlay that is already loaded is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay loader fails.
    async fn load_overlay(&self, name: &str, params: &[&str]) -> Result<()>;

    /// Reboot the system immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the reboot command cannot be run.
    async fn reboot(&self) -> Result<()>;
}
