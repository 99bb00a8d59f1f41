use crate::cli::{ConfigTxtArgs, toggle};
use anyhow::{Context, Result};
use configurator_core::Settings;
use configurator_core::constants::HIFIBERRY_OVERLAY_PREFIX;
use configurator_soundcard::BootConfigFile;
use std::process::ExitCode;
use tracing::info;

/// Apply the requested edits to the boot configuration.
///
/// With `--report-change` the exit status is 1 when the file was written.
pub fn configtxt(settings: &Settings, args: ConfigTxtArgs) -> Result<ExitCode> {
    let written = edit(settings, &args)?;

    if args.report_change && written {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Returns whether the file was written.
fn edit(settings: &Settings, args: &ConfigTxtArgs) -> Result<bool> {
    let mut config = BootConfigFile::load(&settings.boot_config).with_context(|| {
        format!(
            "Failed to open boot configuration {}",
            settings.boot_config.display()
        )
    })?;

    apply(&mut config, args);
    let written = config.save()?;
    if written {
        info!("{} updated", config.path().display());
    }
    Ok(written)
}

fn apply(config: &mut BootConfigFile, args: &ConfigTxtArgs) {
    if args.default_config {
        config.apply_defaults();
    }
    if args.remove_hifiberry {
        config.remove_overlays_matching_prefix(HIFIBERRY_OVERLAY_PREFIX);
    }
    if let Some(overlay) = &args.overlay {
        config.enable_overlay(overlay, None);
    }
    if let Some(enabled) = toggle(args.enable_onboard_sound, args.disable_onboard_sound) {
        config.set_onboard_sound(enabled);
    }
    if let Some(enabled) = toggle(args.enable_hdmi_sound, args.disable_hdmi_sound) {
        config.set_hdmi_sound(enabled);
    }
    if let Some(enabled) = toggle(args.enable_eeprom, args.disable_eeprom) {
        config.set_eeprom_read(enabled);
    }
    if let Some(enabled) = toggle(args.enable_i2c, args.disable_i2c) {
        config.set_i2c(enabled);
    }
    if let Some(enabled) = toggle(args.enable_spi, args.disable_spi) {
        config.set_spi(enabled);
    }
    if args.enable_updi {
        config.enable_updi();
    }
    if let Some(enabled) = toggle(args.enable_hat_i2c, args.disable_hat_i2c) {
        config.set_hat_i2c(enabled);
    }
}
