//! Outcome of one detection run.

use serde::Serialize;
use std::fmt;

/// Name shown when no card, or no catalog profile, was found.
pub const UNKNOWN_CARD: &str = "Unknown";

/// Which source produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DetectionSource {
    /// Product string of the HAT EEPROM.
    #[serde(rename = "HAT-EEPROM")]
    HatEeprom,

    /// Register signature on the I2C bus.
    #[serde(rename = "I2C-probe")]
    I2cProbe,

    /// Name of the loaded ALSA driver.
    #[serde(rename = "aplay-output")]
    AplayOutput,

    /// Chip family reported by the DSP service.
    #[serde(rename = "DSP-probe")]
    DspProbe,

    /// Card comment written by an earlier run.
    #[serde(rename = "config-comment")]
    ConfigComment,

    /// Fallback profile requested by the caller.
    #[serde(rename = "fallback")]
    Fallback,

    /// Nothing detected.
    #[serde(rename = "none")]
    None,
}

impl DetectionSource {
    /// Stable tag used in logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HatEeprom => "HAT-EEPROM",
            Self::I2cProbe => "I2C-probe",
            Self::AplayOutput => "aplay-output",
            Self::DspProbe => "DSP-probe",
            Self::ConfigComment => "config-comment",
            Self::Fallback => "fallback",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected overlay and card name, or nothing.
///
/// Either both overlay and name are set, or neither is; the constructors are
/// the only way to build a result.
///
/// ```
/// use configurator_soundcard::{DetectionResult, DetectionSource};
///
/// let result = DetectionResult::detected("dacplusdsp", "DAC+ DSP", DetectionSource::AplayOutput);
/// assert_eq!(result.overlay(), Some("dacplusdsp"));
/// assert_eq!(result.display_name(), "DAC+ DSP");
///
/// let none = DetectionResult::none();
/// assert!(!none.is_detected());
/// assert_eq!(none.display_name(), "Unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    overlay: Option<String>,
    name: Option<String>,
    source: DetectionSource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<String>,
}

impl DetectionResult {
    /// Nothing detected.
    pub fn none() -> Self {
        Self {
            overlay: None,
            name: None,
            source: DetectionSource::None,
            alternatives: Vec::new(),
        }
    }

    /// A detected card.
    pub fn detected(
        overlay: impl Into<String>,
        name: impl Into<String>,
        source: DetectionSource,
    ) -> Self {
        Self {
            overlay: Some(overlay.into()),
            name: Some(name.into()),
            source,
            alternatives: Vec::new(),
        }
    }

    /// Record the other candidates that shared the winning overlay.
    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        if self.is_detected() {
            self.alternatives = alternatives;
        }
        self
    }

    /// Overlay identifier, possibly with parameters (`amp100,automute`).
    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    /// Resolved card name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for display, `"Unknown"` when nothing was detected.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(UNKNOWN_CARD)
    }

    pub fn source(&self) -> DetectionSource {
        self.source
    }

    /// Candidates left unresolved by every tiebreak, in catalog order.
    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    pub fn is_detected(&self) -> bool {
        self.overlay.is_some()
    }
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.overlay) {
            (Some(name), Some(overlay)) => {
                write!(f, "{} (hifiberry-{}, via {})", name, overlay, self.source)
            }
            _ => f.write_str(UNKNOWN_CARD),
        }
    }
}
