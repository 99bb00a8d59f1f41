//! Subcommand implementations.
//!
//! Each command prints its result on stdout and returns the process exit
//! code. Errors bubble up to `main` as `anyhow::Error`.

mod configtxt;
mod detect;
mod dsp;
mod hat;
mod soundcard;

pub use configtxt::configtxt;
pub use detect::detect;
pub use dsp::dsp;
pub use hat::hat;
pub use soundcard::{cards, soundcard};

use anyhow::{Context, Result};
use configurator_core::Settings;
use configurator_hardware::devices::Peripherals;
use configurator_soundcard::SoundcardService;

fn service(settings: &Settings) -> Result<SoundcardService> {
    SoundcardService::from_settings(settings, Peripherals::system(settings)).with_context(|| {
        format!(
            "Failed to open boot configuration {}",
            settings.boot_config.display()
        )
    })
}
