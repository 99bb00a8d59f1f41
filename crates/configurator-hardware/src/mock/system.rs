//! Mock system control.

use super::CallCounter;
use crate::error::{HardwareError, Result};
use crate::traits::SystemControl;
use std::sync::{Arc, Mutex, PoisonError};

/// Mock system control recording overlay loads and reboots.
///
/// # Examples
///
/// ```
/// use configurator_hardware::mock::MockSystemControl;
/// use configurator_hardware::traits::SystemControl;
///
/// #[tokio::main]
/// async fn main() -> configurator_hardware::Result<()> {
///     let control = MockSystemControl::new();
///     control.load_overlay("hifiberry-amp100", &["automute"]).await?;
///
///     assert_eq!(
///         control.loaded_overlays(),
///         vec![("hifiberry-amp100".to_string(), vec!["automute".to_string()])]
///     );
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockSystemControl {
    /// Overlays loaded so far with their parameters
    overlays: Arc<Mutex<Vec<(String, Vec<String>)>>>,

    /// Reboot requests
    reboots: CallCounter,

    /// Fail every overlay load
    fail_overlay_load: bool,
}

impl MockSystemControl {
    /// A system control where every action succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A system control whose overlay loader fails.
    pub fn failing_overlay_load() -> Self {
        Self {
            fail_overlay_load: true,
            ..Self::default()
        }
    }

    /// Overlays loaded so far.
    pub fn loaded_overlays(&self) -> Vec<(String, Vec<String>)> {
        self.overlays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Counter of reboot requests.
    pub fn reboots(&self) -> CallCounter {
        self.reboots.clone()
    }
}

impl SystemControl for MockSystemControl {
    async fn load_overlay(&self, name: &str, params: &[&str]) -> Result<()> {
        if self.fail_overlay_load {
            return Err(HardwareError::command_failed(
                "dtoverlay",
                format!("failed to apply overlay '{}'", name),
            ));
        }

        self.overlays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((
                name.to_string(),
                params.iter().map(|param| param.to_string()).collect(),
            ));
        Ok(())
    }

    async fn reboot(&self) -> Result<()> {
        self.reboots.hit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reboot_counted() {
        let control = MockSystemControl::new();
        let reboots = control.reboots();

        control.reboot().await.unwrap();
        assert_eq!(reboots.count(), 1);
    }

    #[tokio::test]
    async fn test_failing_overlay_load() {
        let control = MockSystemControl::failing_overlay_load();
        assert!(control.load_overlay("hifiberry-dac", &[]).await.is_err());
        assert!(control.loaded_overlays().is_empty());
    }

    #[tokio::test]
    async fn test_clone_shares_records() {
        let control = MockSystemControl::new();
        let observer = control.clone();

        control.load_overlay("hifiberry-digi", &[]).await.unwrap();
        assert_eq!(observer.loaded_overlays().len(), 1);
    }
}
