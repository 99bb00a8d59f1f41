//! Core constants shared by the configurator crates.
//!
//! These values describe where the appliance keeps its files, which marker
//! lines the sound-card tooling writes into the boot configuration, and the
//! defaults used when talking to local services.
//!
//! # Boot configuration markers
//!
//! The sound-card writer keeps the overlay line and a descriptive comment
//! together, comment first:
//!
//! ```text
//! # HiFiBerry card: DAC+ DSP
//! dtoverlay=hifiberry-dacplusdsp
//! ```
//!
//! ```
//! use configurator_core::constants::*;
//!
//! let comment = format!("{}{}", CARD_COMMENT_PREFIX, "DAC+ DSP");
//! assert_eq!(comment, "# HiFiBerry card: DAC+ DSP");
//!
//! let overlay = format!("{}{}", HIFIBERRY_OVERLAY_LINE_PREFIX, "dacplusdsp");
//! assert_eq!(overlay, "dtoverlay=hifiberry-dacplusdsp");
//! ```

// ============================================================================
// File Locations
// ============================================================================

/// Default location of the boot configuration file.
pub const DEFAULT_BOOT_CONFIG: &str = "/boot/firmware/config.txt";

/// Sentinel file written when a change only takes effect after a reboot.
pub const DEFAULT_REBOOT_FILE: &str = "/tmp/reboot";

/// Default location of the optional settings file.
pub const DEFAULT_SETTINGS_FILE: &str = "/etc/configurator.toml";

/// Suffix appended to the boot configuration path for its one-time backup.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Directory where the firmware exposes the HAT EEPROM contents.
pub const HAT_SYSFS_DIR: &str = "/proc/device-tree/hat";

// ============================================================================
// Boot Configuration Markers
// ============================================================================

/// Overlay key prefix in the boot configuration.
pub const OVERLAY_LINE_PREFIX: &str = "dtoverlay=";

/// Prefix shared by every HiFiBerry overlay name.
pub const HIFIBERRY_OVERLAY_PREFIX: &str = "hifiberry";

/// Prefix of a complete HiFiBerry overlay line, up to the overlay identifier.
pub const HIFIBERRY_OVERLAY_LINE_PREFIX: &str = "dtoverlay=hifiberry-";

/// Prefix of the descriptive comment written above the active overlay.
pub const CARD_COMMENT_PREFIX: &str = "# HiFiBerry card: ";

/// A boot configuration containing this exact line opts out of automatic
/// sound-card detection.
pub const DETECTION_DISABLED_MARKER: &str = "# configurator: disable soundcard detection";

/// Overlay that exposes the HAT I2C pins as a GPIO I2C bus.
pub const HAT_I2C_OVERLAY_LINE: &str = "dtoverlay=i2c-gpio,i2c_gpio_sda=0,i2c_gpio_scl=1";

// ============================================================================
// Detection Defaults
// ============================================================================

/// Number of HAT EEPROM read attempts before giving up.
pub const DEFAULT_HAT_READ_ATTEMPTS: u32 = 3;

/// Delay between HAT EEPROM read attempts, in milliseconds.
pub const HAT_RETRY_DELAY_MS: u64 = 1000;

/// I2C bus probed for sound-card chips.
pub const DEFAULT_I2C_BUS: u8 = 1;

/// Timeout applied to every external command, in milliseconds.
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// DSP Service
// ============================================================================

/// Host of the local DSP detection service.
pub const DEFAULT_DSP_HOST: &str = "localhost";

/// Port of the local DSP detection service.
pub const DEFAULT_DSP_PORT: u16 = 13141;

/// Timeout for a DSP detection request, in milliseconds.
pub const DEFAULT_DSP_TIMEOUT_MS: u64 = 2000;

/// Path of the DSP detection endpoint.
pub const DSP_DETECT_PATH: &str = "/hardware/dsp";

/// Chip family marker reported for ADAU14xx based DSP boards.
pub const DSP_CHIP_FAMILY_MARKER: &str = "ADAU14";
