//! I2C access through `i2cget`.

use super::command;
use crate::error::{HardwareError, Result};
use crate::traits::I2cBus;
use std::time::Duration;

/// I2C bus accessed with the `i2c-tools` command line utilities.
#[derive(Debug, Clone)]
pub struct I2cToolsBus {
    timeout: Duration,
}

impl I2cToolsBus {
    /// Create a bus accessor with the given per-read timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Parse an `i2cget` answer such as `0x07`.
fn parse_hex_byte(output: &str) -> Result<u8> {
    let digits = output
        .trim()
        .strip_prefix("0x")
        .ok_or_else(|| HardwareError::invalid_data(format!("expected hex byte, got '{}'", output)))?;
    u8::from_str_radix(digits, 16)
        .map_err(|_| HardwareError::invalid_data(format!("expected hex byte, got '{}'", output)))
}

impl I2cBus for I2cToolsBus {
    async fn read_register(&self, bus: u8, address: u8, register: u8) -> Result<u8> {
        let bus = bus.to_string();
        let address = format!("0x{:02x}", address);
        let register = register.to_string();
        let output = command::run(
            "i2cget",
            &["-y", &bus, &address, &register],
            self.timeout,
        )
        .await?;
        parse_hex_byte(&output)
    }
}
