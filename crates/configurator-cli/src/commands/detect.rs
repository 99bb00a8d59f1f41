use super::service;
use crate::cli::DetectArgs;
use anyhow::Result;
use configurator_core::Settings;
use configurator_soundcard::DetectionResult;
use std::process::ExitCode;
use tracing::warn;

/// Detect the card, optionally storing it in the boot configuration.
///
/// Exits with status 1 when no card was detected and no fallback applied.
pub async fn detect(settings: &Settings, args: DetectArgs) -> Result<ExitCode> {
    let mut service = service(settings)?;
    let fallback = args.fallback.or_else(|| settings.fallback_profile.clone());

    let result = service
        .detect_and_configure(args.store, fallback.as_deref(), args.load, args.reboot)
        .await?;

    println!("{}", render(&result, args.json)?);

    if result.is_detected() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("No sound card detected");
        Ok(ExitCode::FAILURE)
    }
}

/// The card name, or `Unknown`; JSON carries overlay, source and alternatives.
fn render(result: &DetectionResult, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(result)?)
    } else {
        Ok(result.display_name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_soundcard::DetectionSource;

    #[test]
    fn test_render_prints_card_name() {
        let result =
            DetectionResult::detected("dacplusdsp", "DAC+ DSP", DetectionSource::AplayOutput);
        assert_eq!(render(&result, false).unwrap(), "DAC+ DSP");
    }

    #[test]
    fn test_render_nothing() {
        assert_eq!(render(&DetectionResult::none(), false).unwrap(), "Unknown");
    }

    #[test]
    fn test_render_json_details() {
        let result = DetectionResult::detected("dacplus-std", "DAC+/Amp2", DetectionSource::I2cProbe);
        let json: serde_json::Value =
            serde_json::from_str(&render(&result, true).unwrap()).unwrap();

        assert_eq!(json["name"], "DAC+/Amp2");
        assert_eq!(json["overlay"], "dacplus-std");
        assert_eq!(json["source"], "I2C-probe");
    }
}
