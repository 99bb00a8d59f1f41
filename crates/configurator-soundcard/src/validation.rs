//! Extra hardware checks for overlays that are easy to misdetect.
//!
//! A source that produces one of these overlays only wins if the check
//! confirms the hardware. Overlays without a registered check are accepted
//! as they are.

use crate::catalog::overlay_base;
use configurator_core::constants::DSP_CHIP_FAMILY_MARKER;
use configurator_hardware::DspService;
use tracing::{debug, info, warn};

/// Validation check for one overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayValidation {
    /// The DSP service must report a chip whose family contains `marker`.
    DspChipFamily { marker: &'static str },
}

/// Registered checks, keyed by overlay base.
const VALIDATIONS: &[(&str, OverlayValidation)] = &[(
    "dacplusdsp",
    OverlayValidation::DspChipFamily {
        marker: DSP_CHIP_FAMILY_MARKER,
    },
)];

impl OverlayValidation {
    /// Check registered for `overlay`, parameters ignored.
    pub fn for_overlay(overlay: &str) -> Option<Self> {
        let base = overlay_base(overlay);
        VALIDATIONS
            .iter()
            .find(|(registered, _)| *registered == base)
            .map(|&(_, validation)| validation)
    }

    /// Run the check.
    pub async fn run<D: DspService>(&self, dsp: &D) -> bool {
        match self {
            Self::DspChipFamily { marker } => match dsp.detect_dsp().await {
                Some(info) => match info.chip_family() {
                    Some(chip) if chip.contains(marker) => {
                        info!("DSP validation: found {}", chip);
                        true
                    }
                    Some(chip) => {
                        warn!("DSP validation: {} is not an {} part", chip, marker);
                        false
                    }
                    None => {
                        warn!("DSP validation: no DSP detected");
                        false
                    }
                },
                None => {
                    warn!("DSP validation: DSP service unavailable");
                    false
                }
            },
        }
    }
}

/// Whether `overlay` passes its registered check, if it has one.
pub async fn validate_overlay<D: DspService>(overlay: &str, dsp: &D) -> bool {
    match OverlayValidation::for_overlay(overlay) {
        Some(validation) => {
            info!("Running additional validation for {}", overlay);
            let passed = validation.run(dsp).await;
            if !passed {
                warn!("Validation failed for {}", overlay);
            }
            passed
        }
        None => {
            debug!("No additional validation required for {}", overlay);
            true
        }
    }
}
