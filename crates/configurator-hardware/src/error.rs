//! Error types for hardware operations.
//!
//! This module defines error types for the collaborators the sound-card
//! tooling talks to: external commands, sysfs files, the I2C bus and the
//! DSP detection service.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Operation timed out after specified duration.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// External command could not be run or exited unsuccessfully.
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Invalid data received from a device or command.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Tool or device is not installed on this system.
    #[error("Unavailable: {device}")]
    Unavailable { device: String },

    /// I/O error while starting or talking to a device.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new command failure error.
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new unavailable error.
    pub fn unavailable(device: impl Into<String>) -> Self {
        Self::Unavailable {
            device: device.into(),
        }
    }
}

impl From<HardwareError> for configurator_core::Error {
    fn from(error: HardwareError) -> Self {
        match error {
            HardwareError::Io(io) => Self::Io(io),
            other => Self::Hardware(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error() {
        let error = HardwareError::timeout(3000);
        assert!(matches!(error, HardwareError::Timeout { .. }));
        assert_eq!(error.to_string(), "Operation timeout after 3000ms");
    }

    #[test]
    fn test_command_failed_error() {
        let error = HardwareError::command_failed("i2cget", "Error: Read failed");
        assert_eq!(
            error.to_string(),
            "Command 'i2cget' failed: Error: Read failed"
        );
    }

    #[test]
    fn test_invalid_data_error() {
        let error = HardwareError::invalid_data("expected hex byte, got 'xx'");
        assert!(matches!(error, HardwareError::InvalidData { .. }));
        assert_eq!(error.to_string(), "Invalid data: expected hex byte, got 'xx'");
    }

    #[test]
    fn test_unavailable_error() {
        let error = HardwareError::unavailable("i2cget");
        assert_eq!(error.to_string(), "Unavailable: i2cget");
    }

    #[test]
    fn test_into_core_error() {
        let error: configurator_core::Error = HardwareError::timeout(100).into();
        assert!(matches!(error, configurator_core::Error::Hardware(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: configurator_core::Error = HardwareError::Io(io).into();
        assert!(matches!(error, configurator_core::Error::Io(_)));
    }
}
