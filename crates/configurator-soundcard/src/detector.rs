//! Sound-card identification.
//!
//! [`CardIdentifier`] asks the hardware which HiFiBerry card is attached,
//! trying each source in a fixed order and stopping at the first one that
//! yields an overlay passing its validation check:
//!
//! 1. HAT EEPROM product string (read with a bounded retry)
//! 2. I2C register signatures
//! 3. Loaded ALSA driver names
//! 4. DSP chip family reported by the DSP service
//!
//! A source whose overlay fails validation counts as a miss and detection
//! moves on. Transient read failures are logged and treated the same way.
//!
//! The HAT source names the card after the EEPROM product string. The other
//! sources only know an overlay, so the card name is resolved from the
//! catalog; when several profiles share the overlay a tiebreak picks one
//! (HAT product, headphone mixer control, designated primary, first in
//! catalog order).
//!
//! # Examples
//!
//! ```
//! use configurator_hardware::devices::Peripherals;
//! use configurator_hardware::mock::{MockAudioDevices, MockDspService};
//! use configurator_soundcard::{BootConfigFile, CardIdentifier, DetectionSource, DetectorOptions};
//!
//! #[tokio::main]
//! async fn main() -> configurator_core::Result<()> {
//! # let dir = tempfile::tempdir()?;
//! # let path = dir.path().join("config.txt");
//! # std::fs::write(&path, "")?;
//!     let peripherals = Peripherals::mock()
//!         .with_audio(MockAudioDevices::new(
//!             "card 0: sndrpihifiberry [snd_rpi_hifiberry_dacplusdsp], device 0: HiFi",
//!         ))
//!         .with_dsp(MockDspService::detected("ADAU1451"));
//!     let options = DetectorOptions {
//!         hat_read_attempts: 1,
//!         ..DetectorOptions::default()
//!     };
//!     let identifier = CardIdentifier::new(peripherals, options);
//!
//!     let mut config = BootConfigFile::load(&path)?;
//!     let result = identifier.detect(&mut config).await?;
//!     assert_eq!(result.name(), Some("DAC+ DSP"));
//!     assert_eq!(result.source(), DetectionSource::AplayOutput);
//!     Ok(())
//! }
//! ```

use crate::bootconfig::BootConfigFile;
use crate::catalog::{CardCatalog, CardProfile, display_candidates, overlay_base};
use crate::probes::{I2C_PROBES, I2cProbe, overlay_for_aplay, overlay_for_dsp_chip, overlay_for_hat};
use crate::result::{DetectionResult, DetectionSource, UNKNOWN_CARD};
use crate::validation::validate_overlay;
use configurator_core::constants::{DEFAULT_HAT_READ_ATTEMPTS, DEFAULT_I2C_BUS, HAT_RETRY_DELAY_MS};
use configurator_core::{Result, Settings};
use configurator_hardware::devices::Peripherals;
use configurator_hardware::{
    AudioDevices, DspService, HatInfo, HatReader, I2cBus, MixerControls, PlaybackDevices,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tunables of a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorOptions {
    /// HAT EEPROM reads before giving up on the HAT source.
    pub hat_read_attempts: u32,

    /// Pause between HAT EEPROM reads.
    pub hat_retry_delay: Duration,

    /// Bus carrying the sound-card chips.
    pub i2c_bus: u8,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            hat_read_attempts: DEFAULT_HAT_READ_ATTEMPTS,
            hat_retry_delay: Duration::from_millis(HAT_RETRY_DELAY_MS),
            i2c_bus: DEFAULT_I2C_BUS,
        }
    }
}

impl DetectorOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            hat_read_attempts: settings.hat_read_attempts,
            i2c_bus: settings.i2c_bus,
            ..Self::default()
        }
    }
}

/// Multi-source sound-card detector.
#[derive(Debug, Clone)]
pub struct CardIdentifier {
    peripherals: Peripherals,
    catalog: &'static CardCatalog,
    options: DetectorOptions,
}

impl CardIdentifier {
    /// Create a detector over the global catalog.
    pub fn new(peripherals: Peripherals, options: DetectorOptions) -> Self {
        Self {
            peripherals,
            catalog: CardCatalog::global(),
            options,
        }
    }

    /// Use another catalog.
    pub fn with_catalog(mut self, catalog: &'static CardCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn peripherals(&self) -> &Peripherals {
        &self.peripherals
    }

    pub fn catalog(&self) -> &'static CardCatalog {
        self.catalog
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    /// Run the detection chain.
    ///
    /// The I2C source enables the I2C interface in `config` and saves it
    /// before probing.
    ///
    /// # Errors
    ///
    /// Only boot configuration I/O fails the run; hardware that does not
    /// answer is a miss.
    pub async fn detect(&self, config: &mut BootConfigFile) -> Result<DetectionResult> {
        self.run_chain(Some(config)).await
    }

    /// Run the detection chain without touching the boot configuration.
    ///
    /// The I2C source needs the interface enabled in the boot configuration,
    /// so it is skipped; HAT, driver and DSP sources are tried as usual.
    pub async fn detect_read_only(&self) -> DetectionResult {
        match self.run_chain(None).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Detection failed: {}", e);
                DetectionResult::none()
            }
        }
    }

    async fn run_chain(&self, config: Option<&mut BootConfigFile>) -> Result<DetectionResult> {
        info!("Detecting HiFiBerry sound card");

        let hat = self.read_hat().await;
        let hat_product = hat.product();
        match hat_product {
            Some(product) => {
                debug!("Retrieved HAT info: {}", hat.summary(true));
                match overlay_for_hat(product) {
                    Some(overlay) => {
                        if validate_overlay(overlay, &self.peripherals.dsp).await {
                            info!("Detected {} from HAT EEPROM", product);
                            return Ok(DetectionResult::detected(
                                overlay,
                                product,
                                DetectionSource::HatEeprom,
                            ));
                        }
                        info!("HAT overlay {} not confirmed, trying I2C", overlay);
                    }
                    None => warn!("No overlay known for HAT product {}", product),
                }
            }
            None => info!("No HAT product information"),
        }

        let probe = match config {
            Some(config) => self.probe_i2c(config).await?,
            None => {
                debug!("Boot configuration is read-only, skipping I2C probe");
                None
            }
        };
        if let Some(probe) = probe {
            if validate_overlay(probe.overlay, &self.peripherals.dsp).await {
                let result = match probe.card {
                    Some(card) => {
                        DetectionResult::detected(probe.overlay, card, DetectionSource::I2cProbe)
                    }
                    None => {
                        self.resolve(probe.overlay, DetectionSource::I2cProbe, hat_product)
                            .await
                    }
                };
                info!("Detected {}", result);
                return Ok(result);
            }
        }

        if let Some(overlay) = self.probe_aplay().await {
            if validate_overlay(overlay, &self.peripherals.dsp).await {
                let result = self
                    .resolve(overlay, DetectionSource::AplayOutput, hat_product)
                    .await;
                info!("Detected {}", result);
                return Ok(result);
            }
        }

        if let Some(overlay) = self.probe_dsp().await {
            if validate_overlay(overlay, &self.peripherals.dsp).await {
                let result = self
                    .resolve(overlay, DetectionSource::DspProbe, hat_product)
                    .await;
                info!("Detected {}", result);
                return Ok(result);
            }
        }

        warn!("No sound card detected");
        Ok(DetectionResult::none())
    }

    /// Trust a card comment left above the active overlay by an earlier run.
    ///
    /// The comment is only used when it names a catalog profile whose overlay
    /// matches the overlay line below it, and some HiFiBerry driver is
    /// loaded. The reported overlay is the one the configuration loads.
    pub async fn identify_from_config_comment(
        &self,
        config: &BootConfigFile,
    ) -> Option<DetectionResult> {
        let (name, overlay) = config.pinned_card()?;
        let Some(profile) = self.catalog.resolve(name) else {
            debug!("Card comment names unknown card {}", name);
            return None;
        };
        if profile.overlay_base() != Some(overlay_base(overlay)) {
            warn!(
                "Card comment names {} but the overlay below it is {}",
                profile.name, overlay
            );
            return None;
        }

        let devices = self.playback_devices().await?;
        if !devices.any_hifiberry() {
            debug!("Card comment names {} but no HiFiBerry driver is loaded", name);
            return None;
        }

        info!("Using card {} from config comment", profile.name);
        Some(DetectionResult::detected(
            overlay,
            profile.name,
            DetectionSource::ConfigComment,
        ))
    }

    /// Config comment first, then the read-only detection chain.
    ///
    /// Never modifies the boot configuration.
    pub async fn identify_current_card(&self, config: &BootConfigFile) -> DetectionResult {
        match self.identify_from_config_comment(config).await {
            Some(result) => result,
            None => self.detect_read_only().await,
        }
    }

    /// ALSA index of the loaded HiFiBerry card.
    pub async fn hardware_index(&self) -> Option<u32> {
        self.playback_devices().await?.hifiberry_card_index()
    }

    async fn read_hat(&self) -> HatInfo {
        let attempts = self.options.hat_read_attempts.max(1);
        let mut info = HatInfo::empty();

        for attempt in 1..=attempts {
            info = self.peripherals.hat.read_hat_info().await;
            if info.has_product() {
                break;
            }
            if attempt < attempts {
                debug!("HAT product not readable (attempt {}/{})", attempt, attempts);
                tokio::time::sleep(self.options.hat_retry_delay).await;
            }
        }

        info
    }

    async fn probe_i2c(&self, config: &mut BootConfigFile) -> Result<Option<&'static I2cProbe>> {
        info!("Probing I2C for sound card");
        config.set_i2c(true);
        config.save()?;

        let bus = self.options.i2c_bus;
        let mut registers: HashMap<(u8, u8), Option<u8>> = HashMap::new();

        for probe in I2C_PROBES {
            let key = (probe.address, probe.register);
            let value = match registers.get(&key) {
                Some(value) => *value,
                None => {
                    let value = match self
                        .peripherals
                        .i2c
                        .read_register(bus, probe.address, probe.register)
                        .await
                    {
                        Ok(value) => Some(value),
                        Err(e) => {
                            debug!("No answer at 0x{:02x} reg {}: {}", probe.address, probe.register, e);
                            None
                        }
                    };
                    registers.insert(key, value);
                    value
                }
            };

            if value == Some(probe.expected) {
                info!(
                    "I2C 0x{:02x} reg {} = 0x{:02x} -> {}",
                    probe.address, probe.register, probe.expected, probe.overlay
                );
                return Ok(Some(probe));
            }
        }

        warn!("No I2C sound card detected");
        Ok(None)
    }

    async fn probe_aplay(&self) -> Option<&'static str> {
        let devices = self.playback_devices().await?;
        let lines: Vec<&str> = devices.hifiberry_lines().collect();
        if lines.is_empty() {
            info!("No HiFiBerry driver loaded");
            return None;
        }

        let listing = lines.join("\n");
        match overlay_for_aplay(&listing) {
            Some(overlay) => {
                info!("Loaded driver maps to overlay {}", overlay);
                Some(overlay)
            }
            None => {
                warn!("Could not map loaded driver to a known card: {}", listing);
                None
            }
        }
    }

    async fn probe_dsp(&self) -> Option<&'static str> {
        info!("Probing for DSP hardware");
        let Some(info) = self.peripherals.dsp.detect_dsp().await else {
            debug!("DSP service unavailable");
            return None;
        };
        let Some(chip) = info.chip_family() else {
            debug!("No DSP detected");
            return None;
        };

        let overlay = overlay_for_dsp_chip(chip);
        match overlay {
            Some(overlay) => info!("DSP {} maps to overlay {}", chip, overlay),
            None => info!("Unknown DSP type {}", chip),
        }
        overlay
    }

    async fn playback_devices(&self) -> Option<PlaybackDevices> {
        match self.peripherals.audio.playback_devices().await {
            Ok(devices) => Some(devices),
            Err(e) => {
                warn!("Unable to list playback devices: {}", e);
                None
            }
        }
    }

    /// Name the card behind `overlay` from the catalog.
    async fn resolve(
        &self,
        overlay: &str,
        source: DetectionSource,
        hat_product: Option<&str>,
    ) -> DetectionResult {
        let base = overlay_base(overlay);
        let candidates = self
            .catalog
            .profiles_for_overlay(base, hat_product.is_none());

        if candidates.is_empty() {
            warn!("No catalog profile uses overlay {}", overlay);
            return DetectionResult::detected(overlay, UNKNOWN_CARD, source);
        }

        let (name, alternatives) = self.choose(base, &candidates, hat_product);
        let name = self.distinguish_headphone(name).await;
        DetectionResult::detected(overlay, name, source).with_alternatives(alternatives)
    }

    fn choose(
        &self,
        base: &str,
        candidates: &[&'static CardProfile],
        hat_product: Option<&str>,
    ) -> (&'static str, Vec<String>) {
        let names: Vec<&'static str> = candidates.iter().map(|profile| profile.name).collect();
        if let [only] = names.as_slice() {
            return (*only, Vec::new());
        }
        debug!("Candidates for {}: {}", base, display_candidates(&names));

        if let Some(product) = hat_product
            && let Some(profile) = candidates.iter().find(|p| p.hat_name == Some(product))
        {
            return (profile.name, Vec::new());
        }

        if let Some(distinction) = self.catalog.headphone_distinction(names[0])
            && distinction.covers_all(&names)
        {
            return (distinction.without_headphone, Vec::new());
        }

        if let Some(primary) = candidates.iter().find(|p| p.overlay_primary) {
            return (primary.name, Vec::new());
        }

        warn!(
            "Ambiguous card for overlay {} ({}), using {}",
            base,
            display_candidates(&names),
            names[0]
        );
        (names[0], names.iter().map(|name| name.to_string()).collect())
    }

    /// Tell apart profiles that differ only by a headphone amplifier.
    async fn distinguish_headphone(&self, name: &'static str) -> &'static str {
        let Some(distinction) = self.catalog.headphone_distinction(name) else {
            return name;
        };

        let Some(index) = self.hardware_index().await else {
            warn!("No HiFiBerry card index, keeping {}", name);
            return name;
        };

        match self.peripherals.mixer.control_names(index).await {
            Ok(controls) => {
                let selected = distinction.select(&controls);
                if selected != name {
                    info!("Mixer controls identify {} rather than {}", selected, name);
                }
                selected
            }
            Err(e) => {
                warn!("Unable to read mixer controls of card {}: {}", index, e);
                name
            }
        }
    }
}
