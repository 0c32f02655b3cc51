//! Error types for Flavorgen core
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for metadata and settings access
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Required configuration file missing: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Override blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Override blob is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Malformed properties line {line}: {message}")]
    Properties { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CoreError::ConfigMissing { path } => {
                format!("Cannot configure the build: {} does not exist", path.display())
            }
            CoreError::Base64(_) | CoreError::InvalidUtf8(_) => {
                format!("{}. Check the encoded local properties variable.", self)
            }
            CoreError::TomlParse(e) => format!("Settings file is invalid: {}", e),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_missing_message_names_path() {
        let err = CoreError::ConfigMissing { path: PathBuf::from("/repo/sager.properties") };
        assert!(err.to_string().contains("/repo/sager.properties"));
        assert!(err.user_message().contains("does not exist"));
    }
}
