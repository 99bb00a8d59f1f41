use super::service;
use crate::cli::SoundcardArgs;
use anyhow::Result;
use configurator_core::Settings;
use configurator_soundcard::{CardCatalog, CardInfo};
use std::process::ExitCode;

/// Show the current card, resolved from the card comment or by detection.
pub async fn soundcard(settings: &Settings, args: SoundcardArgs) -> Result<ExitCode> {
    let service = service(settings)?;
    let info = service.card_info(args.volume_control_softvol).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", render(&info, &args));
    }
    Ok(ExitCode::SUCCESS)
}

/// Print every catalog profile as JSON.
pub fn cards() -> Result<ExitCode> {
    let profiles = CardCatalog::global().profiles();
    println!("{}", serde_json::to_string_pretty(profiles)?);
    Ok(ExitCode::SUCCESS)
}

fn render(info: &CardInfo, args: &SoundcardArgs) -> String {
    let volume_control = info.volume_control.as_deref().unwrap_or_default();
    let hardware_index = info
        .hardware_index
        .map(|index| index.to_string())
        .unwrap_or_default();

    if args.name {
        info.name.clone()
    } else if args.volume_control || args.volume_control_softvol {
        volume_control.to_string()
    } else if args.hw {
        hardware_index
    } else if args.output_channels {
        info.output_channels.to_string()
    } else if args.input_channels {
        info.input_channels.to_string()
    } else if args.features {
        info.features.join(",")
    } else {
        let features = if info.features.is_empty() {
            "None".to_string()
        } else {
            info.features.join(", ")
        };
        [
            "Sound card details:".to_string(),
            format!("Name: {}", info.name),
            format!("Overlay: {}", info.overlay.as_deref().unwrap_or("None")),
            format!("Detected via: {}", info.source),
            format!("Volume Control: {}", volume_control),
            format!(
                "Headphone Volume Control: {}",
                info.headphone_volume_control.as_deref().unwrap_or("None")
            ),
            format!("Hardware Index: {}", hardware_index),
            format!("Output Channels: {}", info.output_channels),
            format!("Input Channels: {}", info.input_channels),
            format!("Features: {}", features),
            format!("HAT Name: {}", info.hat_name.as_deref().unwrap_or("None")),
            format!("Supports DSP: {}", if info.supports_dsp { "Yes" } else { "No" }),
        ]
        .join("\n")
    }
}
