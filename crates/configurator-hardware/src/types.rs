//! Data returned by the hardware collaborators.
//!
//! These are the values handed back by HAT readers, audio-device enumerators
//! and the DSP detection service, together with the small amount of parsing
//! needed to interpret them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the attached HAT as stored in its EEPROM.
///
/// Every field is optional: boards without an EEPROM, unreadable EEPROMs and
/// placeholder values all produce `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatInfo {
    /// Vendor string (e.g. "HiFiBerry").
    pub vendor: Option<String>,

    /// Product string (e.g. "DAC2 Pro").
    pub product: Option<String>,

    /// Board UUID.
    pub uuid: Option<Uuid>,
}

impl HatInfo {
    /// HAT information with nothing known.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create HAT information from a vendor and product.
    pub fn new(vendor: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            vendor: Some(vendor.into()),
            product: Some(product.into()),
            uuid: None,
        }
    }

    /// Set the UUID.
    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Product string if it is present and not blank.
    pub fn product(&self) -> Option<&str> {
        self.product
            .as_deref()
            .map(str::trim)
            .filter(|product| !product.is_empty())
    }

    /// Whether a usable product string was read.
    pub fn has_product(&self) -> bool {
        self.product().is_some()
    }

    /// Render as `vendor:product` or `vendor:product:uuid`.
    ///
    /// ```
    /// use configurator_hardware::HatInfo;
    ///
    /// assert_eq!(HatInfo::empty().summary(false), "no vendor:no product");
    /// assert_eq!(HatInfo::new("HiFiBerry", "Amp4").summary(true), "HiFiBerry:Amp4:unknown");
    /// ```
    pub fn summary(&self, include_uuid: bool) -> String {
        let vendor = self.vendor.as_deref().unwrap_or("no vendor");
        let product = self.product.as_deref().unwrap_or("no product");
        if include_uuid {
            let uuid = self
                .uuid
                .map(|uuid| uuid.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("{}:{}:{}", vendor, product, uuid)
        } else {
            format!("{}:{}", vendor, product)
        }
    }
}

/// Text listing of the loaded ALSA playback devices (as printed by `aplay -l`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackDevices(String);

impl PlaybackDevices {
    /// Wrap a device listing.
    pub fn new(listing: impl Into<String>) -> Self {
        Self(listing.into())
    }

    /// Raw listing.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lines describing a HiFiBerry card.
    ///
    /// The generic `pcm5102` DAC driver also carries the hifiberry name and
    /// is not a HiFiBerry board, so those lines are skipped.
    pub fn hifiberry_lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines().filter(|line| {
            let line = line.to_lowercase();
            line.contains("hifiberry") && !line.contains("pcm5102")
        })
    }

    /// Whether some HiFiBerry card driver is loaded.
    pub fn has_hifiberry(&self) -> bool {
        self.hifiberry_lines().next().is_some()
    }

    /// Whether any HiFiBerry-family driver is loaded, the `pcm5102` based
    /// DAC+ Light driver included.
    pub fn any_hifiberry(&self) -> bool {
        self.0.to_lowercase().contains("hifiberry")
    }

    /// ALSA card index of the first HiFiBerry card.
    ///
    /// ```
    /// use configurator_hardware::PlaybackDevices;
    ///
    /// let devices = PlaybackDevices::new(
    ///     "card 0: vc4hdmi [vc4-hdmi], device 0: MAI PCM\n\
    ///      card 2: sndrpihifiberry [snd_rpi_hifiberry_dacplus], device 0: HiFiBerry DAC+ HiFi",
    /// );
    /// assert_eq!(devices.hifiberry_card_index(), Some(2));
    /// ```
    pub fn hifiberry_card_index(&self) -> Option<u32> {
        self.hifiberry_lines().find_map(|line| {
            let head = line.split(':').next()?.trim();
            head.strip_prefix("card ")?.trim().parse().ok()
        })
    }
}

/// Answer from the DSP detection service.
///
/// Wire format: `{"status": "detected", "detected_dsp": "ADAU1451"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DspInfo {
    /// Detection status reported by the service.
    pub status: String,

    /// Chip family of the detected DSP.
    #[serde(default)]
    pub detected_dsp: Option<String>,
}

impl DspInfo {
    /// A detected DSP of the given chip family.
    pub fn detected(chip: impl Into<String>) -> Self {
        Self {
            status: "detected".to_string(),
            detected_dsp: Some(chip.into()),
        }
    }

    /// A service answer reporting no DSP.
    pub fn not_detected() -> Self {
        Self {
            status: "not_detected".to_string(),
            detected_dsp: None,
        }
    }

    /// Whether the service reports a detected DSP.
    pub fn is_detected(&self) -> bool {
        self.status == "detected"
    }

    /// Chip family when a DSP was detected.
    pub fn chip_family(&self) -> Option<&str> {
        if self.is_detected() {
            self.detected_dsp.as_deref()
        } else {
            None
        }
    }
}

/// Parse `amixer scontrols` output into control names.
///
/// ```
/// use configurator_hardware::types::parse_mixer_controls;
///
/// let names = parse_mixer_controls("Simple mixer control 'Digital',0\nSimple mixer control 'Headphone',0\n");
/// assert_eq!(names, vec!["Digital", "Headphone"]);
/// ```
pub fn parse_mixer_controls(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let start = line.find('\'')? + 1;
            let end = start + line[start..].find('\'')?;
            Some(line[start..end].to_string())
        })
        .collect()
}
