//! Mock I2C bus.

use super::CallCounter;
use crate::error::{HardwareError, Result};
use crate::traits::I2cBus;
use std::collections::HashMap;

/// Mock I2C bus backed by a register map.
///
/// Reads of registers that were not set fail the way `i2cget` does when no
/// device answers.
///
/// # Examples
///
/// ```
/// use configurator_hardware::mock::MockI2cBus;
/// use configurator_hardware::traits::I2cBus;
///
/// #[tokio::main]
/// async fn main() {
///     let bus = MockI2cBus::new().with_register(1, 0x4a, 25, 0x07);
///
///     assert_eq!(bus.read_register(1, 0x4a, 25).await.unwrap(), 0x07);
///     assert!(bus.read_register(1, 0x3b, 1).await.is_err());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockI2cBus {
    /// (bus, address, register) -> value
    registers: HashMap<(u8, u8, u8), u8>,

    /// Calls so far
    calls: CallCounter,
}

impl MockI2cBus {
    /// An empty bus where no device answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of a register.
    pub fn with_register(mut self, bus: u8, address: u8, register: u8, value: u8) -> Self {
        self.registers.insert((bus, address, register), value);
        self
    }

    /// Counter of `read_register` calls.
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl I2cBus for MockI2cBus {
    async fn read_register(&self, bus: u8, address: u8, register: u8) -> Result<u8> {
        self.calls.hit();
        self.registers
            .get(&(bus, address, register))
            .copied()
            .ok_or_else(|| {
                HardwareError::command_failed(
                    "i2cget",
                    format!("no answer from 0x{:02x} on bus {}", address, bus),
                )
            })
    }
}
