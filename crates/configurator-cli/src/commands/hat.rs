use anyhow::Result;
use configurator_core::Settings;
use configurator_hardware::HatReader;
use configurator_hardware::devices::Peripherals;
use std::process::ExitCode;

/// Print `vendor:product`, with the UUID appended when `all` is set.
pub async fn hat(settings: &Settings, all: bool) -> Result<ExitCode> {
    let peripherals = Peripherals::system(settings);
    let info = peripherals.hat.read_hat_info().await;
    println!("{}", info.summary(all));
    Ok(ExitCode::SUCCESS)
}
