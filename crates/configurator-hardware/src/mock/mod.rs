//! Mock collaborator implementations for testing and development.
//!
//! This module provides scripted implementations of every collaborator trait
//! that can be set up programmatically without requiring physical hardware.
//! Each mock counts its calls through a shared [`CallCounter`], so tests can
//! assert which sources a detection run consulted.

pub mod alsa;
pub mod dsp;
pub mod hat;
pub mod i2c;
pub mod system;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// Re-export commonly used types
pub use alsa::{MockAudioDevices, MockMixerControls};
pub use dsp::MockDspService;
pub use hat::MockHatReader;
pub use i2c::MockI2cBus;
pub use system::MockSystemControl;

/// Shared call counter.
///
/// Clones observe the same count, so a test can keep one clone while the mock
/// itself is moved into the detector.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call.
    pub(crate) fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of calls recorded so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
