//! Line-buffer model of the boot configuration file.
//!
//! [`BootConfigFile`] reads the whole file into memory, lets callers mutate
//! the buffer through small idempotent operations and writes it back in one
//! [`save`](BootConfigFile::save). The SHA-256 checksum taken at load time
//! gates the write: an unmodified buffer never touches the disk.
//!
//! Before the first write that changes content, the original file is copied
//! to `<path>.backup`. An existing backup is never overwritten, so the backup
//! always holds the configuration as it was before the tooling first touched
//! it.
//!
//! # Examples
//!
//! ```no_run
//! use configurator_soundcard::BootConfigFile;
//!
//! # fn example() -> configurator_core::Result<()> {
//! let mut config = BootConfigFile::load("/boot/firmware/config.txt")?;
//! config.set_onboard_sound(false);
//! config.enable_overlay("hifiberry-dacplus-std", Some("DAC+/Amp2"));
//!
//! if config.save()? {
//!     println!("config.txt changed, reboot required");
//! }
//! # Ok(())
//! # }
//! ```

use configurator_core::constants::{
    BACKUP_SUFFIX, CARD_COMMENT_PREFIX, DETECTION_DISABLED_MARKER, HAT_I2C_OVERLAY_LINE,
    HIFIBERRY_OVERLAY_LINE_PREFIX, HIFIBERRY_OVERLAY_PREFIX, OVERLAY_LINE_PREFIX,
};
use configurator_core::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// In-memory copy of a line-oriented configuration file.
#[derive(Debug, Clone)]
pub struct BootConfigFile {
    path: PathBuf,

    /// Lines including their terminators; only the last may lack one.
    lines: Vec<String>,

    /// Checksum of the content last read from or written to disk.
    baseline: String,

    changed: bool,
}

impl BootConfigFile {
    /// Read `path` into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigFileNotFound`] if the file does not exist and
    /// [`Error::Io`] if it cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ConfigFileNotFound(path.clone()),
            _ => Error::Io(e),
        })?;

        let lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();
        debug!("Loaded {} lines from {}", lines.len(), path.display());

        Ok(Self {
            path,
            baseline: checksum(&content),
            lines,
            changed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup copy written before the first change.
    pub fn backup_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(BACKUP_SUFFIX);
        PathBuf::from(path)
    }

    /// Buffer lines without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|line| line.trim_end_matches(['\n', '\r']))
    }

    /// Current buffer content.
    pub fn content(&self) -> String {
        self.lines.concat()
    }

    /// SHA-256 of the current buffer as lowercase hex.
    pub fn checksum(&self) -> String {
        checksum(&self.content())
    }

    /// Whether the buffer differs from what is on disk.
    pub fn is_modified(&self) -> bool {
        self.checksum() != self.baseline
    }

    /// Whether the last [`save`](Self::save) wrote the file.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Whether some line equals `line` once surrounding whitespace is trimmed.
    pub fn has_marker(&self, line: &str) -> bool {
        let line = line.trim();
        self.lines.iter().any(|existing| existing.trim() == line)
    }

    /// Replace the first line starting with `prefix`, or append `replacement`.
    ///
    /// Duplicates present before the call are left alone.
    pub fn upsert_line_by_prefix(&mut self, prefix: &str, replacement: &str) {
        let replacement = terminated(replacement);
        match self
            .lines
            .iter()
            .position(|line| line.trim().starts_with(prefix))
        {
            Some(index) => self.lines[index] = replacement,
            None => self.push_line(replacement),
        }
    }

    /// Remove every line whose trimmed text satisfies `predicate`.
    ///
    /// Returns the number of lines removed.
    pub fn remove_lines_matching(&mut self, mut predicate: impl FnMut(&str) -> bool) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !predicate(line.trim()));
        before - self.lines.len()
    }

    /// Append `line` unless it is already present.
    ///
    /// Returns whether the line was appended.
    pub fn append_line_once(&mut self, line: &str) -> bool {
        if self.has_marker(line) {
            return false;
        }
        self.push_line(terminated(line));
        true
    }

    /// Insert `line` before the line at `index`.
    pub fn insert_line(&mut self, index: usize, line: &str) {
        if index >= self.lines.len() {
            self.push_line(terminated(line));
        } else {
            self.lines.insert(index, terminated(line));
        }
    }

    fn push_line(&mut self, line: String) {
        if let Some(last) = self.lines.last_mut()
            && !last.ends_with('\n')
        {
            last.push('\n');
        }
        self.lines.push(line);
    }

    fn position(&self, line: &str) -> Option<usize> {
        let line = line.trim();
        self.lines.iter().position(|existing| existing.trim() == line)
    }

    /// Write the buffer back if it changed since it was loaded or last saved.
    ///
    /// Returns whether the file was written. The first write creates
    /// `<path>.backup` from the file on disk unless a backup already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup or the file cannot be written.
    pub fn save(&mut self) -> Result<bool> {
        let content = self.content();
        let checksum = checksum(&content);

        if checksum == self.baseline {
            debug!("{} unchanged, not writing", self.path.display());
            self.changed = false;
            return Ok(false);
        }

        let backup = self.backup_path();
        if backup.exists() {
            debug!("Keeping existing backup {}", backup.display());
        } else {
            fs::copy(&self.path, &backup)?;
            info!("Backup created at {}", backup.display());
        }

        fs::write(&self.path, content)?;
        info!("Changes saved to {}", self.path.display());

        self.baseline = checksum;
        self.changed = true;
        Ok(true)
    }

    // ========================================================================
    // Peripheral toggles
    // ========================================================================

    /// `dtparam=audio=on|off`
    pub fn set_onboard_sound(&mut self, enabled: bool) {
        self.upsert_line_by_prefix("dtparam=audio=", &format!("dtparam=audio={}", on_off(enabled)));
        info!("Onboard sound {}", enabled_disabled(enabled));
    }

    /// Toggle the `,noaudio` option of the KMS video overlay.
    pub fn set_hdmi_sound(&mut self, enabled: bool) {
        for line in self
            .lines
            .iter_mut()
            .filter(|line| line.trim().starts_with("dtoverlay=vc4-kms-v3d"))
        {
            let has_noaudio = line.contains(",noaudio");
            if !enabled && !has_noaudio {
                *line = format!("{},noaudio\n", line.trim());
            } else if enabled && has_noaudio {
                *line = format!("{}\n", line.replace(",noaudio", "").trim());
            }
        }
        info!("HDMI sound {}", enabled_disabled(enabled));
    }

    /// `force_eeprom_read=1|0`
    pub fn set_eeprom_read(&mut self, enabled: bool) {
        let value = if enabled { 1 } else { 0 };
        self.upsert_line_by_prefix("force_eeprom_read=", &format!("force_eeprom_read={}", value));
        info!("EEPROM read {}", enabled_disabled(enabled));
    }

    /// `dtparam=i2c_arm=on|off`
    pub fn set_i2c(&mut self, enabled: bool) {
        self.set_interface("i2c_arm", enabled);
    }

    /// `dtparam=spi=on|off`
    pub fn set_spi(&mut self, enabled: bool) {
        self.set_interface("spi", enabled);
    }

    fn set_interface(&mut self, interface: &str, enabled: bool) {
        self.upsert_line_by_prefix(
            &format!("dtparam={}=", interface),
            &format!("dtparam={}={}", interface, on_off(enabled)),
        );
        info!("{} interface set to {}", interface.to_uppercase(), on_off(enabled));
    }

    /// UART settings needed to program the board controller over UPDI.
    pub fn enable_updi(&mut self) {
        self.upsert_line_by_prefix("enable_uart=", "enable_uart=1");
        self.upsert_line_by_prefix("dtoverlay=uart0", "dtoverlay=uart0");
        self.upsert_line_by_prefix("dtoverlay=disable-bt", "dtoverlay=disable-bt");
        info!("UPDI settings applied, reboot may be required");
    }

    /// Software I2C bus on the HAT EEPROM pins.
    pub fn set_hat_i2c(&mut self, enabled: bool) {
        if enabled {
            if self.append_line_once(HAT_I2C_OVERLAY_LINE) {
                info!("HAT I2C overlay enabled");
            }
        } else if self.remove_lines_matching(|line| line == HAT_I2C_OVERLAY_LINE) > 0 {
            info!("HAT I2C overlay disabled");
        }
    }

    /// Reset to the stock appliance configuration.
    pub fn apply_defaults(&mut self) {
        self.remove_overlays_matching_prefix(HIFIBERRY_OVERLAY_PREFIX);
        self.set_onboard_sound(false);
        self.set_hdmi_sound(false);
        self.set_eeprom_read(true);
        self.set_spi(true);
        self.set_i2c(false);
        self.set_hat_i2c(false);
        info!("Default configuration applied");
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    /// Add `dtoverlay=<overlay>` once, optionally with a card comment above it.
    pub fn enable_overlay(&mut self, overlay: &str, comment: Option<&str>) {
        let line = format!("{}{}", OVERLAY_LINE_PREFIX, overlay);
        if self.append_line_once(&line) {
            info!("Overlay {} enabled", overlay);
        }
        if let Some(name) = comment {
            self.set_card_comment(&line, name);
        }
    }

    /// Remove every `dtoverlay=<prefix>*` line.
    pub fn remove_overlays_matching_prefix(&mut self, prefix: &str) -> usize {
        let prefix = format!("{}{}", OVERLAY_LINE_PREFIX, prefix);
        let removed = self.remove_lines_matching(|line| line.starts_with(&prefix));
        if removed > 0 {
            info!("Removed {} overlay line(s) matching {}", removed, prefix);
        }
        removed
    }

    /// Active HiFiBerry overlay lines, trimmed.
    pub fn hifiberry_overlay_lines(&self) -> Vec<&str> {
        let prefix = format!("{}{}", OVERLAY_LINE_PREFIX, HIFIBERRY_OVERLAY_PREFIX);
        self.lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| line.starts_with(&prefix))
            .collect()
    }

    /// Remove every card comment.
    pub fn remove_card_comments(&mut self) -> usize {
        let prefix = CARD_COMMENT_PREFIX.trim_end();
        self.remove_lines_matching(|line| line.starts_with(prefix))
    }

    /// Put a single card comment directly above `overlay_line`.
    ///
    /// Returns `false` when the overlay line is not in the buffer.
    pub fn set_card_comment(&mut self, overlay_line: &str, name: &str) -> bool {
        self.remove_card_comments();
        match self.position(overlay_line) {
            Some(index) => {
                self.insert_line(index, &format!("{}{}", CARD_COMMENT_PREFIX, name));
                debug!("Card comment set to {}", name);
                true
            }
            None => false,
        }
    }

    /// Card name from the comment directly above the first HiFiBerry overlay.
    ///
    /// ```no_run
    /// # use configurator_soundcard::BootConfigFile;
    /// # fn example(config: &BootConfigFile) {
    /// // # HiFiBerry card: DAC2 Pro
    /// // dtoverlay=hifiberry-dacplus-pro
    /// assert_eq!(config.card_comment(), Some("DAC2 Pro"));
    /// # }
    /// ```
    pub fn card_comment(&self) -> Option<&str> {
        self.pinned_card().map(|(name, _)| name)
    }

    /// Card comment together with the overlay of the line below it, without
    /// the `hifiberry-` prefix.
    pub fn pinned_card(&self) -> Option<(&str, &str)> {
        let prefix = format!("{}{}", OVERLAY_LINE_PREFIX, HIFIBERRY_OVERLAY_PREFIX);
        let index = self
            .lines
            .iter()
            .position(|line| line.trim().starts_with(&prefix))?;
        let overlay = self.lines[index]
            .trim()
            .strip_prefix(HIFIBERRY_OVERLAY_LINE_PREFIX)?;
        let above = self.lines.get(index.checked_sub(1)?)?.trim();
        let name = above.strip_prefix(CARD_COMMENT_PREFIX.trim_end())?.trim();
        (!name.is_empty() && !overlay.is_empty()).then_some((name, overlay))
    }

    /// Whether the operator pinned the configuration with the disable marker.
    pub fn is_detection_disabled(&self) -> bool {
        self.has_marker(DETECTION_DISABLED_MARKER)
    }
}

fn checksum(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

fn terminated(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{}\n", line)
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn enabled_disabled(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    const STOCK: &str = "# Raspberry Pi config\n\
        dtparam=audio=on\n\
        dtoverlay=vc4-kms-v3d\n\
        [all]\n";

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn load(content: &str) -> (TempDir, BootConfigFile) {
        let (dir, path) = write_config(content);
        (dir, BootConfigFile::load(path).unwrap())
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let err = BootConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigFileNotFound(p) if p == path));
    }

    #[test]
    fn test_save_without_changes_does_not_write() {
        let (_dir, mut config) = load(STOCK);

        assert!(!config.save().unwrap());
        assert!(!config.changed());
        assert!(!config.backup_path().exists());
    }

    #[test]
    fn test_save_writes_and_backs_up() {
        let (_dir, mut config) = load(STOCK);
        config.set_onboard_sound(false);

        assert!(config.save().unwrap());
        assert!(config.changed());
        assert_eq!(fs::read_to_string(config.backup_path()).unwrap(), STOCK);
        assert!(fs::read_to_string(config.path()).unwrap().contains("dtparam=audio=off\n"));

        assert!(!config.save().unwrap());
        assert!(!config.changed());
    }

    #[test]
    fn test_existing_backup_is_kept() {
        let (_dir, mut config) = load(STOCK);
        fs::write(config.backup_path(), "older backup\n").unwrap();

        config.set_spi(true);
        config.save().unwrap();
        assert_eq!(fs::read_to_string(config.backup_path()).unwrap(), "older backup\n");
    }

    #[test]
    fn test_has_marker_trims() {
        let (_dir, config) = load("  dtparam=audio=on  \n");
        assert!(config.has_marker("dtparam=audio=on"));
        assert!(!config.has_marker("dtparam=audio"));
    }

    #[test]
    fn test_upsert_replaces_first_match_only() {
        let (_dir, mut config) = load("dtparam=spi=off\ndtparam=spi=off\n");
        config.set_spi(true);

        let lines: Vec<_> = config.lines().collect();
        assert_eq!(lines, vec!["dtparam=spi=on", "dtparam=spi=off"]);
    }

    #[test]
    fn test_append_terminates_last_line() {
        let (_dir, mut config) = load("dtparam=audio=on");
        assert!(config.append_line_once("dtoverlay=hifiberry-dac"));
        assert!(!config.append_line_once("dtoverlay=hifiberry-dac"));
        assert_eq!(config.content(), "dtparam=audio=on\ndtoverlay=hifiberry-dac\n");
    }

    #[rstest]
    #[case(false, "dtoverlay=vc4-kms-v3d", "dtoverlay=vc4-kms-v3d,noaudio")]
    #[case(false, "dtoverlay=vc4-kms-v3d,noaudio", "dtoverlay=vc4-kms-v3d,noaudio")]
    #[case(true, "dtoverlay=vc4-kms-v3d,noaudio", "dtoverlay=vc4-kms-v3d")]
    #[case(true, "dtoverlay=vc4-kms-v3d", "dtoverlay=vc4-kms-v3d")]
    fn test_set_hdmi_sound(#[case] enabled: bool, #[case] before: &str, #[case] after: &str) {
        let (_dir, mut config) = load(&format!("{}\n", before));
        config.set_hdmi_sound(enabled);
        assert_eq!(config.content(), format!("{}\n", after));
    }

    #[test]
    fn test_hat_i2c_toggle() {
        let (_dir, mut config) = load(STOCK);

        config.set_hat_i2c(true);
        config.set_hat_i2c(true);
        assert_eq!(config.lines().filter(|l| *l == HAT_I2C_OVERLAY_LINE).count(), 1);

        config.set_hat_i2c(false);
        assert!(!config.has_marker(HAT_I2C_OVERLAY_LINE));
        assert_eq!(config.content(), STOCK);
    }

    #[test]
    fn test_enable_updi_is_idempotent() {
        let (_dir, mut config) = load(STOCK);
        config.enable_updi();
        let once = config.content();
        config.enable_updi();

        assert_eq!(config.content(), once);
        assert!(config.has_marker("enable_uart=1"));
        assert!(config.has_marker("dtoverlay=uart0"));
        assert!(config.has_marker("dtoverlay=disable-bt"));
    }

    #[test]
    fn test_apply_defaults() {
        let (_dir, mut config) = load(
            "dtparam=audio=on\ndtoverlay=vc4-kms-v3d\ndtoverlay=hifiberry-dacplus-std\ndtparam=i2c_arm=on\n",
        );
        config.apply_defaults();

        let lines: Vec<_> = config.lines().collect();
        assert_eq!(
            lines,
            vec![
                "dtparam=audio=off",
                "dtoverlay=vc4-kms-v3d,noaudio",
                "dtparam=i2c_arm=off",
                "force_eeprom_read=1",
                "dtparam=spi=on",
            ]
        );
    }

    #[test]
    fn test_enable_overlay_with_comment() {
        let (_dir, mut config) = load(STOCK);
        config.enable_overlay("hifiberry-dacplusdsp", Some("DAC+ DSP"));
        config.enable_overlay("hifiberry-dacplusdsp", Some("DAC+ DSP"));

        assert_eq!(config.hifiberry_overlay_lines(), vec!["dtoverlay=hifiberry-dacplusdsp"]);
        assert_eq!(config.card_comment(), Some("DAC+ DSP"));
        assert!(config.content().ends_with("# HiFiBerry card: DAC+ DSP\ndtoverlay=hifiberry-dacplusdsp\n"));
    }

    #[test]
    fn test_remove_overlays_and_comments() {
        let (_dir, mut config) = load(
            "# HiFiBerry card: Amp100\ndtoverlay=hifiberry-amp100,automute\ndtoverlay=hifiberry-dac\ndtoverlay=vc4-kms-v3d\n",
        );

        assert_eq!(config.remove_overlays_matching_prefix(HIFIBERRY_OVERLAY_PREFIX), 2);
        assert_eq!(config.remove_card_comments(), 1);
        assert_eq!(config.content(), "dtoverlay=vc4-kms-v3d\n");
    }

    #[test]
    fn test_card_comment_must_be_directly_above() {
        let (_dir, config) = load("# HiFiBerry card: DAC2 Pro\n\ndtoverlay=hifiberry-dacplus-pro\n");
        assert_eq!(config.card_comment(), None);

        let (_dir, config) = load("dtoverlay=hifiberry-dacplus-pro\n");
        assert_eq!(config.card_comment(), None);
    }

    #[test]
    fn test_pinned_card_reports_overlay_below_comment() {
        let (_dir, config) =
            load("# HiFiBerry card: Amp100
dtoverlay=hifiberry-amp100,automute
");
        assert_eq!(config.pinned_card(), Some(("Amp100", "amp100,automute")));
    }

    #[test]
    fn test_detection_disabled_marker() {
        let (_dir, config) = load(STOCK);
        assert!(!config.is_detection_disabled());

        let (_dir, config) = load(&format!("{}{}\n", STOCK, DETECTION_DISABLED_MARKER));
        assert!(config.is_detection_disabled());
    }
}
