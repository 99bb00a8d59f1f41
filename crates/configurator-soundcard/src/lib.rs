//! HiFiBerry sound-card detection and boot configuration.
//!
//! This crate decides which sound card is attached and writes the matching
//! device-tree overlay into the boot configuration file.
//!
//! # Architecture
//!
//! - [`BootConfigFile`]: line buffer over `config.txt` with checksum-gated
//!   saves and a write-once backup
//! - [`CardCatalog`]: static registry of card profiles with an overlay index
//! - [`CardIdentifier`]: prioritized detection over the hardware
//!   collaborators from `configurator-hardware`
//! - [`BootConfigWriter`]: applies a [`DetectionResult`] to the boot
//!   configuration
//! - [`SoundcardService`]: the operations above combined for the CLI
//!
//! # Examples
//!
//! ```no_run
//! use configurator_core::Settings;
//! use configurator_hardware::devices::Peripherals;
//! use configurator_soundcard::SoundcardService;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> configurator_core::Result<()> {
//!     let settings = Settings::discover(None)?;
//!     let mut service = SoundcardService::from_settings(&settings, Peripherals::system(&settings))?;
//!
//!     let result = service
//!         .detect_and_configure(true, Some("DAC+ Light"), false, false)
//!         .await?;
//!     println!("{}", result.display_name());
//!     Ok(())
//! }
//! ```

pub mod bootconfig;
pub mod catalog;
pub mod detector;
pub mod probes;
mod profiles;
pub mod result;
pub mod service;
pub mod validation;
pub mod writer;

pub use bootconfig::BootConfigFile;
pub use catalog::{CardCatalog, CardProfile};
pub use detector::{CardIdentifier, DetectorOptions};
pub use result::{DetectionResult, DetectionSource};
pub use service::{CardInfo, SoundcardService};
pub use writer::{BootConfigWriter, ConfigureOutcome};
