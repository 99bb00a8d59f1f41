//! Common test utilities for integration tests.
//!
//! Every test gets its own temporary directory holding the boot configuration,
//! the reboot sentinel and, when asked for, the event log. Peripherals come
//! from the mock implementations in `configurator-hardware`.

#![allow(dead_code)]

use configurator_core::Settings;
use configurator_hardware::devices::Peripherals;
use configurator_soundcard::{BootConfigFile, SoundcardService};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// `aplay -l` listing of a DAC+ Light, driven by the generic pcm5102 codec.
pub const APLAY_DAC: &str =
    "card 0: sndrpihifiberry [snd_rpi_hifiberry_dac], device 0: HifiBerry DAC HiFi pcm5102a-hifi-0 []";

/// `aplay -l` listing of a DAC+ DSP.
pub const APLAY_DACPLUSDSP: &str = "card 0: sndrpihifiberry [snd_rpi_hifiberry_dacplusdsp]";

/// `aplay -l` listing of a DAC+ Pro or DAC2 Pro.
pub const APLAY_DACPLUSPRO: &str =
    "card 1: sndrpihifiberry [snd_rpi_hifiberry_dacpluspro], device 0: HiFiBerry DAC+ Pro HiFi pcm512x-hifi-0 []";

/// Temporary appliance: boot configuration plus sentinel locations.
pub struct Appliance {
    pub dir: TempDir,
    pub settings: Settings,
}

impl Appliance {
    /// Appliance whose boot configuration holds `content`.
    pub fn with_config(content: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let boot_config = dir.path().join("config.txt");
        fs::write(&boot_config, content).expect("write config.txt");

        let settings = Settings {
            boot_config,
            reboot_file: dir.path().join("reboot"),
            event_log: Some(dir.path().join("events.log")),
            ..Settings::default()
        };
        Self { dir, settings }
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.settings.boot_config
    }

    pub fn backup_path(&self) -> PathBuf {
        self.dir.path().join("config.txt.backup")
    }

    /// Current content of the boot configuration on disk.
    pub fn config_on_disk(&self) -> String {
        fs::read_to_string(self.config_path()).expect("read config.txt")
    }

    pub fn load_config(&self) -> BootConfigFile {
        BootConfigFile::load(self.config_path()).expect("load config.txt")
    }

    pub fn reboot_marker(&self) -> Option<String> {
        fs::read_to_string(&self.settings.reboot_file).ok()
    }

    pub fn event_log(&self) -> Option<String> {
        fs::read_to_string(self.dir.path().join("events.log")).ok()
    }

    pub fn service(&self, peripherals: Peripherals) -> SoundcardService {
        SoundcardService::from_settings(&self.settings, peripherals).expect("build service")
    }
}

/// Lines of `content` equal to `line`.
pub fn count_lines(content: &str, line: &str) -> usize {
    content.lines().filter(|l| l.trim() == line).count()
}
