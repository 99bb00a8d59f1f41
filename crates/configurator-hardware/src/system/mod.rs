//! Linux implementations of the collaborator traits.
//!
//! These talk to the real system: sysfs for the HAT EEPROM, `i2c-tools`,
//! `alsa-utils`, the DSP detection service over HTTP, and the `dtoverlay` and
//! `reboot` commands. Every external command runs under a timeout.

mod command;
pub mod control;
pub mod dsp;
pub mod hat;
pub mod i2c;
pub mod alsa;

pub use alsa::{AmixerControls, AplayDevices};
pub use control::CommandSystemControl;
pub use dsp::HttpDspService;
pub use hat::SysfsHatReader;
pub use i2c::I2cToolsBus;
