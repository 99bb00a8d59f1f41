//! HiFiBerry card table.
//!
//! Table order matters: it is the candidate order returned by
//! [`CardCatalog::profiles_for_overlay`](crate::catalog::CardCatalog::profiles_for_overlay).

use crate::catalog::{CardProfile, HeadphoneDistinction};

const STEREO_OUT: CardProfile = CardProfile {
    name: "",
    aliases: &[],
    overlay: None,
    hat_name: None,
    volume_control: None,
    headphone_volume_control: None,
    output_channels: 2,
    input_channels: 0,
    features: &[],
    supports_dsp: false,
    card_type: &[],
    is_pro: false,
    overlay_primary: false,
};

pub(crate) static PROFILES: &[CardProfile] = &[
    CardProfile {
        name: "DAC8x/ADC8x",
        overlay: Some("dac8x"),
        hat_name: Some("DAC8x"),
        output_channels: 8,
        input_channels: 8,
        card_type: &["DAC", "ADC"],
        is_pro: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC8x",
        aliases: &["StudioDAC8x"],
        overlay: Some("dac8x"),
        hat_name: Some("DAC8x"),
        output_channels: 8,
        card_type: &["DAC"],
        is_pro: true,
        overlay_primary: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "Digi2 Pro",
        aliases: &["Digi Pro"],
        overlay: Some("digi-pro"),
        hat_name: Some("Digi2 Pro"),
        volume_control: Some("Softvol"),
        features: &["dsp"],
        supports_dsp: true,
        card_type: &["Digi"],
        is_pro: true,
        overlay_primary: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "Amp100",
        overlay: Some("amp100,automute"),
        hat_name: Some("Amp100"),
        volume_control: Some("Digital"),
        features: &["spdifnoclock", "toslink"],
        card_type: &["Amp"],
        is_pro: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "Amp3",
        overlay: Some("amp3"),
        hat_name: Some("Amp3"),
        volume_control: Some("A.Mstr Vol"),
        features: &["usehwvolume"],
        card_type: &["Amp"],
        ..STEREO_OUT
    },
    CardProfile {
        name: "Amp4",
        overlay: Some("dacplus-std"),
        hat_name: Some("Amp4"),
        volume_control: Some("Digital"),
        features: &["usehwvolume"],
        supports_dsp: true,
        card_type: &["Amp"],
        ..STEREO_OUT
    },
    CardProfile {
        name: "Amp4 Pro",
        overlay: Some("amp4pro"),
        hat_name: Some("Amp4 Pro"),
        volume_control: Some("Digital"),
        features: &["usehwvolume"],
        supports_dsp: true,
        card_type: &["Amp"],
        is_pro: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DSP 2x4",
        overlay: Some("dacplusdsp"),
        hat_name: Some("DSP 2x4"),
        features: &["dsp"],
        card_type: &["DSP"],
        is_pro: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC+ ADC Pro",
        overlay: Some("dacplusadcpro"),
        hat_name: Some("DAC+ ADC Pro"),
        volume_control: Some("Digital"),
        input_channels: 2,
        features: &["analoginput"],
        card_type: &["DAC", "ADC"],
        is_pro: true,
        overlay_primary: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC+ ADC",
        overlay: Some("dacplusadc"),
        hat_name: Some("DAC+ ADC"),
        volume_control: Some("Digital"),
        input_channels: 2,
        features: &["analoginput"],
        card_type: &["DAC", "ADC"],
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC2 ADC Pro",
        overlay: Some("dacplusadcpro"),
        hat_name: Some("DAC2 ADC Pro"),
        volume_control: Some("Digital"),
        input_channels: 2,
        features: &["analoginput"],
        supports_dsp: true,
        card_type: &["DAC", "ADC"],
        is_pro: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC2 HD",
        aliases: &["DAC 2 HD", "DAC+ HD"],
        overlay: Some("dacplushd"),
        hat_name: Some("DAC2 HD"),
        volume_control: Some("DAC"),
        supports_dsp: true,
        card_type: &["DAC"],
        is_pro: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC+ DSP",
        overlay: Some("dacplusdsp"),
        hat_name: Some("DAC+ DSP"),
        features: &["toslink"],
        card_type: &["DAC", "DSP"],
        overlay_primary: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC+/Amp2",
        aliases: &["DAC+", "Amp2", "DAC+ Standard"],
        overlay: Some("dacplus-std"),
        volume_control: Some("Digital"),
        card_type: &["DAC", "Amp"],
        overlay_primary: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC2 Pro",
        overlay: Some("dacplus-pro"),
        hat_name: Some("DAC2 Pro"),
        volume_control: Some("Digital"),
        headphone_volume_control: Some("Headphone"),
        card_type: &["DAC"],
        is_pro: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC+ Pro",
        overlay: Some("dacplus-pro"),
        volume_control: Some("Digital"),
        card_type: &["DAC"],
        is_pro: true,
        overlay_primary: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "Amp+",
        aliases: &["Amp"],
        overlay: Some("amp"),
        card_type: &["Amp"],
        ..STEREO_OUT
    },
    CardProfile {
        name: "Digi+ Pro",
        overlay: Some("digi-pro"),
        features: &["digi"],
        supports_dsp: true,
        card_type: &["Digi"],
        is_pro: true,
        ..STEREO_OUT
    },
    CardProfile {
        name: "Digi+",
        aliases: &["Digi"],
        overlay: Some("digi"),
        features: &["digi"],
        card_type: &["Digi"],
        ..STEREO_OUT
    },
    CardProfile {
        name: "Beocreate 4-Channel Amplifier",
        aliases: &["Beocreate"],
        overlay: Some("beo"),
        hat_name: Some("Beocreate 4-Channel Amplifier"),
        features: &["dsp", "toslink"],
        card_type: &["Amp", "DSP"],
        ..STEREO_OUT
    },
    CardProfile {
        name: "DAC+ Light",
        aliases: &["DAC+ Zero", "MiniAmp", "DAC+ Zero/Light/MiniAmp"],
        overlay: Some("dac"),
        card_type: &["DAC"],
        ..STEREO_OUT
    },
];

pub(crate) static DISTINCTIONS: &[HeadphoneDistinction] = &[HeadphoneDistinction {
    without_headphone: "DAC+ Pro",
    with_headphone: "DAC2 Pro",
}];
