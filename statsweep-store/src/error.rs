//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

use statsweep_core::CoreError;
use statsweep_fetch::FetchError;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration file does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// Core model error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// HTTP client setup error.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

impl StoreError {
    /// Returns true if the configuration itself is missing or wrong, as
    /// opposed to a failure while acting on a valid one.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound(_) | Self::Config(_) | Self::Parse(_) | Self::Core(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_spec_error_passes_through() {
        let err: StoreError = CoreError::InvalidFieldSpec {
            name: "viewCount".to_string(),
            reason: "path is empty".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid field spec 'viewCount': path is empty");
    }

    #[test]
    fn test_not_found_shows_path() {
        let err = StoreError::ConfigNotFound(PathBuf::from("/tmp/none.toml"));
        assert!(err.to_string().contains("/tmp/none.toml"));
    }

    #[test]
    fn test_config_error_classification() {
        assert!(StoreError::ConfigNotFound(PathBuf::from("/tmp/none.toml")).is_config_error());
        assert!(StoreError::Config("max_pages must be at least 1".into()).is_config_error());
        assert!(!StoreError::Fetch(FetchError::Transport("tls".into())).is_config_error());
        assert!(!StoreError::Io(std::io::Error::other("disk full")).is_config_error());
    }
}
