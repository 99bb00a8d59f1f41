//! Overlay loading and reboot through system commands.

use super::command;
use crate::error::Result;
use crate::traits::SystemControl;
use std::time::Duration;
use tracing::{debug, info};

/// System control running `dtoverlay` and `reboot`.
#[derive(Debug, Clone)]
pub struct CommandSystemControl {
    timeout: Duration,
}

impl CommandSystemControl {
    /// Create a system control with the given command timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Whether `dtoverlay -l` output lists `name`.
///
/// Entries look like `0:  hifiberry-dacplus`.
fn is_loaded(listing: &str, name: &str) -> bool {
    listing
        .lines()
        .filter_map(|line| line.split_once(':'))
        .any(|(_, overlay)| overlay.split_whitespace().next() == Some(name))
}

impl SystemControl for CommandSystemControl {
    async fn load_overlay(&self, name: &str, params: &[&str]) -> Result<()> {
        let loaded = command::run("dtoverlay", &["-l"], self.timeout).await?;
        if is_loaded(&loaded, name) {
            debug!("Overlay {} already loaded", name);
            return Ok(());
        }

        let mut args = vec![name];
        args.extend_from_slice(params);
        command::run("dtoverlay", &args, self.timeout).await?;
        info!("Loaded overlay {} {:?}", name, params);
        Ok(())
    }

    async fn reboot(&self) -> Result<()> {
        info!("Rebooting system");
        command::run("reboot", &[], self.timeout).await?;
        Ok(())
    }
}
