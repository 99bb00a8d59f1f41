//! ALSA enumeration through `aplay` and `amixer`.

use super::command;
use crate::error::Result;
use crate::traits::{AudioDevices, MixerControls};
use crate::types::{PlaybackDevices, parse_mixer_controls};
use std::time::Duration;

/// Playback-device enumerator running `aplay -l`.
#[derive(Debug, Clone)]
pub struct AplayDevices {
    timeout: Duration,
}

impl AplayDevices {
    /// Create an enumerator with the given command timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl AudioDevices for AplayDevices {
    async fn playback_devices(&self) -> Result<PlaybackDevices> {
        let output = command::run("aplay", &["-l"], self.timeout).await?;
        Ok(PlaybackDevices::new(output))
    }
}

/// Mixer enumerator running `amixer -c <card> scontrols`.
#[derive(Debug, Clone)]
pub struct AmixerControls {
    timeout: Duration,
}

impl AmixerControls {
    /// Create an enumerator with the given command timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl MixerControls for AmixerControls {
    async fn control_names(&self, card_index: u32) -> Result<Vec<String>> {
        let card = card_index.to_string();
        let output = command::run("amixer", &["-c", &card, "scontrols"], self.timeout).await?;
        Ok(parse_mixer_controls(&output))
    }
}
