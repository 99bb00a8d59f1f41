//! Mock ALSA device and mixer enumerators.

use super::CallCounter;
use crate::error::{HardwareError, Result};
use crate::traits::{AudioDevices, MixerControls};
use crate::types::PlaybackDevices;
use std::collections::HashMap;

/// Mock playback-device enumerator returning a fixed listing.
///
/// # Examples
///
/// ```
/// use configurator_hardware::mock::MockAudioDevices;
/// use configurator_hardware::traits::AudioDevices;
///
/// #[tokio::main]
/// async fn main() {
///     let devices = MockAudioDevices::new("card 0: sndrpihifiberry [snd_rpi_hifiberry_dacplusdsp]");
///     let listing = devices.playback_devices().await.unwrap();
///     assert!(listing.has_hifiberry());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockAudioDevices {
    /// Listing, or `None` to simulate a failing `aplay`
    listing: Option<String>,

    /// Calls so far
    calls: CallCounter,
}

impl MockAudioDevices {
    /// Enumerator returning `listing`.
    pub fn new(listing: impl Into<String>) -> Self {
        Self {
            listing: Some(listing.into()),
            calls: CallCounter::new(),
        }
    }

    /// Enumerator with no sound cards.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Enumerator whose command fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Counter of `playback_devices` calls.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl AudioDevices for MockAudioDevices {
    async fn playback_devices(&self) -> Result<PlaybackDevices> {
        self.calls.hit();
        self.listing
            .as_deref()
            .map(PlaybackDevices::new)
            .ok_or_else(|| HardwareError::unavailable("aplay"))
    }
}

/// Mock mixer enumerator with per-card control lists.
#[derive(Debug, Clone, Default)]
pub struct MockMixerControls {
    /// card index -> control names
    cards: HashMap<u32, Vec<String>>,

    /// Calls so far
    calls: CallCounter,
}

impl MockMixerControls {
    /// Enumerator without any cards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card with the given control names.
    pub fn with_controls(mut self, card_index: u32, controls: &[&str]) -> Self {
        self.cards.insert(
            card_index,
            controls.iter().map(|name| name.to_string()).collect(),
        );
        self
    }

    /// Counter of `control_names` calls.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl MixerControls for MockMixerControls {
    async fn control_names(&self, card_index: u32) -> Result<Vec<String>> {
        self.calls.hit();
        self.cards.get(&card_index).cloned().ok_or_else(|| {
            HardwareError::command_failed("amixer", format!("Invalid card number {}", card_index))
        })
    }
}
