//! Shared building blocks for the configurator workspace.
//!
//! Holds the constants every crate agrees on (default file locations, marker
//! lines written into the boot configuration, service endpoints), the common
//! error type and the TOML settings layer.

pub mod constants;
pub mod error;
pub mod settings;

pub use error::{Error, Result};
pub use settings::Settings;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
