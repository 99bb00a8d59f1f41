//! Registry of known sound-card profiles.
//!
//! The catalog maps canonical card names to [`CardProfile`]s and keeps a
//! reverse index from overlay base names to the profiles using them. Several
//! profiles may share one overlay (the DAC+ DSP and the DSP 2x4 both use
//! `dacplusdsp`), so resolving a card from an overlay may yield more than one
//! candidate; see [`CardCatalog::profiles_for_overlay`].
//!
//! The registry is built once from a static table and never mutated:
//!
//! ```
//! use configurator_soundcard::catalog::CardCatalog;
//!
//! let catalog = CardCatalog::global();
//! let profile = catalog.lookup("DAC+ DSP").unwrap();
//! assert_eq!(profile.overlay, Some("dacplusdsp"));
//! assert!(catalog.lookup("dac+ dsp").is_none());
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Capabilities of one sound-card model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardProfile {
    /// Canonical name, unique across the catalog.
    pub name: &'static str,

    /// Other names the card is known by.
    pub aliases: &'static [&'static str],

    /// Overlay identifier without the `hifiberry-` prefix, possibly with
    /// comma-separated parameters (`amp100,automute`).
    #[serde(rename = "dtoverlay")]
    pub overlay: Option<&'static str>,

    /// Product string stored in the HAT EEPROM, for boards that carry one.
    pub hat_name: Option<&'static str>,

    /// Main volume mixer control.
    pub volume_control: Option<&'static str>,

    /// Headphone amplifier mixer control.
    pub headphone_volume_control: Option<&'static str>,

    /// Number of output channels.
    pub output_channels: u8,

    /// Number of input channels.
    pub input_channels: u8,

    /// Feature flags (e.g. `toslink`, `usehwvolume`).
    pub features: &'static [&'static str],

    /// Whether the card can be driven through the DSP toolchain.
    pub supports_dsp: bool,

    /// Card type tags (e.g. `DAC`, `Amp`).
    pub card_type: &'static [&'static str],

    /// Whether the card belongs to the pro line.
    pub is_pro: bool,

    /// Preferred profile when several profiles share this overlay.
    #[serde(skip)]
    pub overlay_primary: bool,
}

impl CardProfile {
    /// Overlay identifier with parameters stripped.
    pub fn overlay_base(&self) -> Option<&'static str> {
        self.overlay.map(overlay_base)
    }

    /// Volume control, falling back to the software volume control.
    pub fn mixer_control_name(&self, use_softvol_fallback: bool) -> Option<&'static str> {
        match self.volume_control {
            Some(control) => Some(control),
            None if use_softvol_fallback => Some("Softvol"),
            None => None,
        }
    }

    /// Whether `name` is this profile's canonical name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// Strip comma-separated parameters from an overlay identifier.
///
/// ```
/// use configurator_soundcard::catalog::overlay_base;
///
/// assert_eq!(overlay_base("amp100,automute"), "amp100");
/// assert_eq!(overlay_base("dacplusdsp"), "dacplusdsp");
/// ```
pub fn overlay_base(overlay: &str) -> &str {
    overlay.split(',').next().unwrap_or(overlay).trim()
}

/// Parameters of an overlay identifier, in order.
///
/// ```
/// use configurator_soundcard::catalog::overlay_params;
///
/// assert_eq!(overlay_params("amp100,automute"), vec!["automute"]);
/// assert!(overlay_params("digi").is_empty());
/// ```
pub fn overlay_params(overlay: &str) -> Vec<&str> {
    overlay
        .split(',')
        .skip(1)
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .collect()
}

/// Two profiles that share overlay and detection signature and differ only
/// by a headphone mixer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadphoneDistinction {
    /// Profile selected when no headphone control exists.
    pub without_headphone: &'static str,

    /// Profile selected when a headphone control exists.
    pub with_headphone: &'static str,
}

impl HeadphoneDistinction {
    /// Whether `name` is one of the pair.
    pub fn covers(&self, name: &str) -> bool {
        self.without_headphone == name || self.with_headphone == name
    }

    /// Whether both candidates belong to the pair.
    pub fn covers_all(&self, names: &[&str]) -> bool {
        !names.is_empty() && names.iter().all(|name| self.covers(name))
    }

    /// Pick a profile from the mixer controls of the card.
    pub fn select(&self, controls: &[String]) -> &'static str {
        let has_headphone = controls
            .iter()
            .any(|control| control.to_lowercase().contains("headphone"));
        if has_headphone {
            self.with_headphone
        } else {
            self.without_headphone
        }
    }
}

/// Immutable name and overlay index over the profile table.
#[derive(Debug)]
pub struct CardCatalog {
    profiles: &'static [CardProfile],
    by_name: HashMap<&'static str, usize>,
    by_overlay: HashMap<&'static str, Vec<usize>>,
    distinctions: &'static [HeadphoneDistinction],
}

static GLOBAL: LazyLock<CardCatalog> =
    LazyLock::new(|| CardCatalog::new(crate::profiles::PROFILES, crate::profiles::DISTINCTIONS));

impl CardCatalog {
    /// Build a catalog over a profile table.
    pub fn new(
        profiles: &'static [CardProfile],
        distinctions: &'static [HeadphoneDistinction],
    ) -> Self {
        let mut by_name = HashMap::with_capacity(profiles.len());
        let mut by_overlay: HashMap<&'static str, Vec<usize>> = HashMap::new();

        for (index, profile) in profiles.iter().enumerate() {
            by_name.insert(profile.name, index);
            if let Some(base) = profile.overlay_base() {
                by_overlay.entry(base).or_default().push(index);
            }
        }

        Self {
            profiles,
            by_name,
            by_overlay,
            distinctions,
        }
    }

    /// The catalog of every known HiFiBerry card.
    pub fn global() -> &'static CardCatalog {
        &GLOBAL
    }

    /// All profiles in table order.
    pub fn profiles(&self) -> &'static [CardProfile] {
        self.profiles
    }

    /// Exact canonical-name lookup.
    pub fn lookup(&self, name: &str) -> Option<&'static CardProfile> {
        self.by_name.get(name).map(|&index| &self.profiles[index])
    }

    /// Alias lookup.
    ///
    /// Callers try [`lookup`](Self::lookup) first; an alias never overrides a
    /// canonical name.
    pub fn lookup_by_alias(&self, name: &str) -> Option<&'static CardProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.aliases.contains(&name))
    }

    /// Canonical lookup, then alias lookup.
    pub fn resolve(&self, name: &str) -> Option<&'static CardProfile> {
        self.lookup(name).or_else(|| self.lookup_by_alias(name))
    }

    /// Profiles whose overlay base equals `overlay_base`, in table order.
    ///
    /// With `prefer_no_hat`, profiles bound to a HAT product are left out as
    /// long as at least one profile without a HAT name remains.
    ///
    /// ```
    /// use configurator_soundcard::catalog::CardCatalog;
    ///
    /// let catalog = CardCatalog::global();
    /// let names: Vec<_> = catalog
    ///     .profiles_for_overlay("dacplus-std", true)
    ///     .iter()
    ///     .map(|profile| profile.name)
    ///     .collect();
    /// assert_eq!(names, vec!["DAC+/Amp2"]);
    /// ```
    pub fn profiles_for_overlay(
        &self,
        overlay_base: &str,
        prefer_no_hat: bool,
    ) -> Vec<&'static CardProfile> {
        let all: Vec<&'static CardProfile> = self
            .by_overlay
            .get(overlay_base)
            .map(|indices| indices.iter().map(|&index| &self.profiles[index]).collect())
            .unwrap_or_default();

        if prefer_no_hat {
            let without_hat: Vec<_> = all
                .iter()
                .copied()
                .filter(|profile| profile.hat_name.is_none())
                .collect();
            if !without_hat.is_empty() {
                return without_hat;
            }
        }

        all
    }

    /// The designated primary profile for a shared overlay.
    pub fn primary_for_overlay(&self, overlay_base: &str) -> Option<&'static CardProfile> {
        self.profiles_for_overlay(overlay_base, false)
            .into_iter()
            .find(|profile| profile.overlay_primary)
    }

    /// Overlay bases used by more than one profile.
    pub fn shared_overlays(&self) -> Vec<&'static str> {
        let mut shared: Vec<_> = self
            .by_overlay
            .iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(&base, _)| base)
            .collect();
        shared.sort_unstable();
        shared
    }

    /// Headphone distinction covering `name`, if any.
    pub fn headphone_distinction(&self, name: &str) -> Option<&'static HeadphoneDistinction> {
        self.distinctions
            .iter()
            .find(|distinction| distinction.covers(name))
    }

    /// Every overlay identifier in the catalog, deduplicated.
    pub fn overlays(&self) -> Vec<&'static str> {
        let mut overlays: Vec<_> = self.profiles.iter().filter_map(|p| p.overlay).collect();
        overlays.sort_unstable();
        overlays.dedup();
        overlays
    }
}

/// Join candidate names for display (`"DSP 2x4/DAC+ DSP"`).
pub fn display_candidates(names: &[&str]) -> String {
    names.join("/")
}
