use crate::cli::DspArgs;
use anyhow::Result;
use configurator_core::Settings;
use configurator_hardware::devices::Peripherals;
use configurator_hardware::{DspInfo, DspService};
use std::process::ExitCode;

/// Ask the DSP detection service what it found.
///
/// Exits with status 1 when no DSP is reported or the service is down.
pub async fn dsp(settings: &Settings, args: DspArgs) -> Result<ExitCode> {
    let peripherals = Peripherals::system(settings);
    let answer = peripherals.dsp.detect_dsp().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        println!("{}", render(answer.as_ref(), args.name));
    }

    match answer.as_ref().and_then(DspInfo::chip_family) {
        Some(_) => Ok(ExitCode::SUCCESS),
        None => Ok(ExitCode::FAILURE),
    }
}

fn render(answer: Option<&DspInfo>, name_only: bool) -> String {
    match answer {
        None if name_only => String::new(),
        None => "DSP detection service unavailable".to_string(),
        Some(info) => match (info.chip_family(), name_only) {
            (Some(chip), true) => chip.to_string(),
            (Some(chip), false) => format!("DSP detected: {}", chip),
            (None, true) => String::new(),
            (None, false) => format!("No DSP detected (status: {})", info.status),
        },
    }
}
