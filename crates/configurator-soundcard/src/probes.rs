//! Fixed detection signatures.
//!
//! Each detection source maps what it observes (a HAT product string, an I2C
//! register value, an ALSA driver name) to an overlay identifier through one
//! of the tables below.

/// HAT EEPROM product string to overlay.
pub const HAT_OVERLAYS: &[(&str, &str)] = &[
    ("Amp100", "amp100,automute"),
    ("DAC+ ADC Pro", "dacplusadcpro"),
    ("DAC+ ADC", "dacplusadc"),
    ("DAC2 ADC Pro", "dacplusadcpro"),
    ("DAC 2 HD", "dacplushd"),
    ("DAC2 HD", "dacplushd"),
    ("DAC2 Pro", "dacplus-pro"),
    ("Digi2 Pro", "digi-pro"),
    ("Amp3", "amp3"),
    ("Amp4 Pro", "amp4pro"),
    ("Amp4", "dacplus-std"),
    ("DAC8x", "dac8x"),
    ("DSP 2x4", "dacplusdsp"),
    ("StudioDAC8x", "dac8x"),
    ("DAC+ DSP", "dacplusdsp"),
    ("Digi Pro", "digi-pro"),
];

/// Overlay for a HAT product string.
pub fn overlay_for_hat(product: &str) -> Option<&'static str> {
    HAT_OVERLAYS
        .iter()
        .find(|(hat, _)| *hat == product)
        .map(|&(_, overlay)| overlay)
}

/// One register signature on the I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cProbe {
    pub address: u8,
    pub register: u8,
    pub expected: u8,
    pub overlay: &'static str,

    /// Card name reported directly, skipping catalog resolution.
    pub card: Option<&'static str>,
}

impl I2cProbe {
    const fn new(address: u8, register: u8, expected: u8, overlay: &'static str) -> Self {
        Self {
            address,
            register,
            expected,
            overlay,
            card: None,
        }
    }

    const fn naming(mut self, card: &'static str) -> Self {
        self.card = Some(card);
        self
    }
}

/// I2C signatures, tried in order.
pub const I2C_PROBES: &[I2cProbe] = &[
    I2cProbe::new(0x4a, 25, 0x07, "dacplusadcpro"),
    I2cProbe::new(0x3b, 1, 0x88, "digi"),
    // The PCM512x at 0x4d is shared by several DAC boards; report the
    // standard DAC+ rather than asking the catalog.
    I2cProbe::new(0x4d, 40, 0x02, "dacplus-std").naming("DAC+/Amp2"),
    I2cProbe::new(0x1b, 0, 0x6c, "amp"),
    I2cProbe::new(0x1b, 0, 0x60, "amp"),
    I2cProbe::new(0x62, 17, 0x8c, "dacplushd"),
    I2cProbe::new(0x60, 2, 0x03, "beo"),
];

/// Kernel driver names to overlay, most specific first.
pub const APLAY_DRIVERS: &[(&str, &str)] = &[
    ("snd_rpi_hifiberry_dacplusadcpro", "dacplusadcpro"),
    ("snd_rpi_hifiberry_dacplusadc", "dacplusadc"),
    ("snd_rpi_hifiberry_dacplusdsp", "dacplusdsp"),
    ("snd_rpi_hifiberrydacplusdsp", "dacplusdsp"),
    ("snd_rpi_hifiberry_dacpluspro", "dacplus-pro"),
    ("snd_rpi_hifiberry_dacplushd", "dacplushd"),
    ("snd_rpi_hifiberry_dacplus", "dacplus-std"),
    ("snd_rpi_hifiberry_dac8x", "dac8x"),
    ("snd_rpi_hifiberry_dac", "dacplus-std"),
    ("snd_rpi_hifiberry_digi", "digi"),
    ("snd_rpi_hifiberry_amp100", "amp100"),
    ("snd_rpi_hifiberry_amp3", "amp3"),
    ("snd_rpi_hifiberry_amp4pro", "amp4pro"),
    ("snd_rpi_hifiberry_amp", "amp"),
    ("snd_rpi_hifiberry_beocreate", "beo"),
];

/// Coarse keywords tried when no driver name matches.
pub const APLAY_KEYWORDS: &[(&str, &str)] = &[
    ("dsp", "dacplusdsp"),
    ("dacplusadcpro", "dacplusadcpro"),
    ("dacplusadc", "dacplusadc"),
    ("dacplus", "dacplus-std"),
    ("digi", "digi"),
    ("amp", "amp"),
];

/// Map a playback-device listing to an overlay.
///
/// Matching is case-insensitive. Driver names win over keywords.
///
/// ```
/// use configurator_soundcard::probes::overlay_for_aplay;
///
/// let line = "card 0: sndrpihifiberry [snd_rpi_hifiberry_dacplusdsp], device 0: HiFiBerry DAC+DSP";
/// assert_eq!(overlay_for_aplay(line), Some("dacplusdsp"));
/// assert_eq!(overlay_for_aplay("card 1: HiFiBerry Digi output"), Some("digi"));
/// assert_eq!(overlay_for_aplay("card 0: vc4hdmi"), None);
/// ```
pub fn overlay_for_aplay(listing: &str) -> Option<&'static str> {
    let listing = listing.to_lowercase();
    APLAY_DRIVERS
        .iter()
        .chain(APLAY_KEYWORDS)
        .find(|(pattern, _)| listing.contains(pattern))
        .map(|&(_, overlay)| overlay)
}

/// Overlay used by boards carrying an ADAU14xx DSP.
pub const DSP_OVERLAY: &str = "dacplusdsp";

/// Overlay for a chip family reported by the DSP service.
pub fn overlay_for_dsp_chip(chip: &str) -> Option<&'static str> {
    chip.contains(configurator_core::constants::DSP_CHIP_FAMILY_MARKER)
        .then_some(DSP_OVERLAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Amp100", Some("amp100,automute"))]
    #[case("DAC 2 HD", Some("dacplushd"))]
    #[case("DAC2 Pro", Some("dacplus-pro"))]
    #[case("Amp4", Some("dacplus-std"))]
    #[case("Amp4 Pro", Some("amp4pro"))]
    #[case("DSP 2x4", Some("dacplusdsp"))]
    #[case("amp100", None)]
    #[case("", None)]
    fn test_overlay_for_hat(#[case] product: &str, #[case] expected: Option<&str>) {
        assert_eq!(overlay_for_hat(product), expected);
    }

    #[rstest]
    #[case("snd_rpi_hifiberry_dacplusadcpro", "dacplusadcpro")]
    #[case("snd_rpi_hifiberry_dacplusadc", "dacplusadc")]
    #[case("snd_rpi_hifiberrydacplusdsp", "dacplusdsp")]
    #[case("snd_rpi_hifiberry_dacpluspro", "dacplus-pro")]
    #[case("snd_rpi_hifiberry_dacplushd", "dacplushd")]
    #[case("snd_rpi_hifiberry_dacplus", "dacplus-std")]
    #[case("snd_rpi_hifiberry_dac8x", "dac8x")]
    #[case("snd_rpi_hifiberry_amp100", "amp100")]
    #[case("snd_rpi_hifiberry_amp4pro", "amp4pro")]
    #[case("snd_rpi_hifiberry_amp", "amp")]
    #[case("SND_RPI_HIFIBERRY_DIGI", "digi")]
    #[case("snd_rpi_hifiberry_beocreate", "beo")]
    fn test_overlay_for_aplay_drivers(#[case] driver: &str, #[case] expected: &str) {
        let line = format!("card 1: sndrpihifiberry [{}], device 0: HiFi", driver);
        assert_eq!(overlay_for_aplay(&line), Some(expected));
    }

    #[rstest]
    #[case("card 1: HiFiBerry DSP board", "dacplusdsp")]
    #[case("card 1: hifiberry dacplus clone", "dacplus-std")]
    #[case("card 1: hifiberry amplifier", "amp")]
    fn test_overlay_for_aplay_keywords(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(overlay_for_aplay(line), Some(expected));
    }

    #[test]
    fn test_aplay_drivers_are_ordered_most_specific_first() {
        for (index, (earlier, _)) in APLAY_DRIVERS.iter().enumerate() {
            for (later, _) in &APLAY_DRIVERS[index + 1..] {
                assert!(
                    !later.contains(earlier),
                    "{} shadows {}",
                    earlier,
                    later
                );
            }
        }
    }

    #[test]
    fn test_i2c_probes_special_case() {
        let named: Vec<_> = I2C_PROBES.iter().filter(|probe| probe.card.is_some()).collect();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].address, 0x4d);
        assert_eq!(named[0].card, Some("DAC+/Amp2"));
    }

    #[rstest]
    #[case("ADAU1451", Some("dacplusdsp"))]
    #[case("ADAU1452", Some("dacplusdsp"))]
    #[case("ADAU1701", None)]
    #[case("", None)]
    fn test_overlay_for_dsp_chip(#[case] chip: &str, #[case] expected: Option<&str>) {
        assert_eq!(overlay_for_dsp_chip(chip), expected);
    }
}
