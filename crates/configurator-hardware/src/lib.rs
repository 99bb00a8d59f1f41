//! Hardware collaborator layer for the configurator toolkit.
//!
//! The sound-card detector needs to look at several parts of the system: the
//! HAT identity EEPROM, chips on the I2C bus, the loaded ALSA drivers and
//! their mixer controls, and a local DSP detection service. After
//! configuring, it may load an overlay into the running kernel or reboot.
//! This crate defines a trait for each of these, a mock implementation for
//! tests and development, and a Linux implementation.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Bounded**: Every external command and HTTP request carries a timeout.
//! - **Tolerant**: "Not present" is a normal answer. The HAT reader and the
//!   DSP service return empty values instead of errors when nothing is there.
//!
//! # Collaborators
//!
//! | Trait | Mock | Linux |
//! |-------|------|-------|
//! | [`HatReader`] | [`MockHatReader`](mock::MockHatReader) | [`SysfsHatReader`](system::SysfsHatReader) |
//! | [`I2cBus`] | [`MockI2cBus`](mock::MockI2cBus) | [`I2cToolsBus`](system::I2cToolsBus) |
//! | [`AudioDevices`] | [`MockAudioDevices`](mock::MockAudioDevices) | [`AplayDevices`](system::AplayDevices) |
//! | [`MixerControls`] | [`MockMixerControls`](mock::MockMixerControls) | [`AmixerControls`](system::AmixerControls) |
//! | [`DspService`] | [`MockDspService`](mock::MockDspService) | [`HttpDspService`](system::HttpDspService) |
//! | [`SystemControl`] | [`MockSystemControl`](mock::MockSystemControl) | [`CommandSystemControl`](system::CommandSystemControl) |
//!
//! # Examples
//!
//! ```no_run
//! use configurator_hardware::devices::Peripherals;
//! use configurator_hardware::traits::AudioDevices;
//! use configurator_core::Settings;
//!
//! # async fn example() -> configurator_hardware::Result<()> {
//! let peripherals = Peripherals::system(&Settings::default());
//! let devices = peripherals.audio.playback_devices().await?;
//! println!("HiFiBerry card index: {:?}", devices.hifiberry_card_index());
//! # Ok(())
//! # }
//! ```

pub mod devices;
pub mod error;
pub mod mock;
pub mod system;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use devices::Peripherals;
pub use error::{HardwareError, Result};
pub use traits::{AudioDevices, DspService, HatReader, I2cBus, MixerControls, SystemControl};
pub use types::{DspInfo, HatInfo, PlaybackDevices};
