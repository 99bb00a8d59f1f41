use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Boot configuration errors
    #[error("Config file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    #[error("Unknown sound card profile: {0}")]
    UnknownProfile(String),

    // Hardware errors
    #[error("Hardware operation failed: {0}")]
    Hardware(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Settings errors
    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_not_found_display() {
        let error = Error::ConfigFileNotFound(PathBuf::from("/boot/firmware/config.txt"));
        assert_eq!(
            error.to_string(),
            "Config file not found: /boot/firmware/config.txt"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: Error = io.into();
        assert!(matches!(error, Error::Io(_)));
    }
}
