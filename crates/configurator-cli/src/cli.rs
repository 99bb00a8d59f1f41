//! Command-line definition.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "configurator")]
#[command(about = "HiFiBerry sound card detection and boot configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true, env = "CONFIGURATOR_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Boot configuration file, overriding the settings
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect the attached sound card
    Detect(DetectArgs),

    /// Edit the boot configuration
    Configtxt(ConfigTxtArgs),

    /// Show details of the current sound card
    #[command(alias = "info")]
    Soundcard(SoundcardArgs),

    /// List every known sound card as JSON
    Cards,

    /// Show the HAT EEPROM identity
    Hat {
        /// Include the board UUID
        #[arg(short, long)]
        all: bool,
    },

    /// Query the DSP detection service
    Dsp(DspArgs),
}

#[derive(Args, Debug, Default)]
pub struct DetectArgs {
    /// Write the detected overlay to the boot configuration
    #[arg(long)]
    pub store: bool,

    /// Profile to use when nothing is detected (defaults to the fallback_profile setting)
    #[arg(long, value_name = "NAME")]
    pub fallback: Option<String>,

    /// Load the overlay into the running kernel after storing it
    #[arg(long, requires = "store")]
    pub load: bool,

    /// Reboot when the stored overlay changed
    #[arg(long, requires = "store")]
    pub reboot: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct ConfigTxtArgs {
    /// Reset to the stock appliance settings before any other change
    #[arg(long)]
    pub default_config: bool,

    /// Remove every HiFiBerry overlay
    #[arg(long)]
    pub remove_hifiberry: bool,

    /// Enable a device-tree overlay, e.g. hifiberry-dacplus-std
    #[arg(long, value_name = "OVERLAY")]
    pub overlay: Option<String>,

    #[arg(long, conflicts_with = "disable_onboard_sound")]
    pub enable_onboard_sound: bool,
    #[arg(long)]
    pub disable_onboard_sound: bool,

    #[arg(long, conflicts_with = "disable_hdmi_sound")]
    pub enable_hdmi_sound: bool,
    #[arg(long)]
    pub disable_hdmi_sound: bool,

    #[arg(long, conflicts_with = "disable_eeprom")]
    pub enable_eeprom: bool,
    #[arg(long)]
    pub disable_eeprom: bool,

    #[arg(long, conflicts_with = "disable_i2c")]
    pub enable_i2c: bool,
    #[arg(long)]
    pub disable_i2c: bool,

    #[arg(long, conflicts_with = "disable_spi")]
    pub enable_spi: bool,
    #[arg(long)]
    pub disable_spi: bool,

    /// Enable the UART settings used for UPDI programming
    #[arg(long)]
    pub enable_updi: bool,

    #[arg(long, conflicts_with = "disable_hat_i2c")]
    pub enable_hat_i2c: bool,
    #[arg(long)]
    pub disable_hat_i2c: bool,

    /// Exit with status 1 if the file was changed
    #[arg(long)]
    pub report_change: bool,
}

/// Collapse an enable/disable flag pair.
pub fn toggle(enable: bool, disable: bool) -> Option<bool> {
    match (enable, disable) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct SoundcardArgs {
    /// Print all details as JSON
    #[arg(long)]
    pub json: bool,

    /// Print only the card name
    #[arg(long)]
    pub name: bool,

    /// Print only the volume control
    #[arg(long)]
    pub volume_control: bool,

    /// Print only the volume control, falling back to Softvol
    #[arg(long)]
    pub volume_control_softvol: bool,

    /// Print only the ALSA hardware index
    #[arg(long)]
    pub hw: bool,

    /// Print only the number of output channels
    #[arg(long)]
    pub output_channels: bool,

    /// Print only the number of input channels
    #[arg(long)]
    pub input_channels: bool,

    /// Print only the features, comma separated
    #[arg(long)]
    pub features: bool,
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct DspArgs {
    /// Print the service answer as JSON
    #[arg(long)]
    pub json: bool,

    /// Print only the chip family
    #[arg(long)]
    pub name: bool,
}
