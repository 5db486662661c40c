//! Error types for trendlens.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias using trendlens' Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for trendlens operations.
///
/// Scoring itself never fails on missing data; these variants describe
/// failures at the collaborator boundary (providers, persistence) and in
/// configuration loading.
#[derive(Error, Debug)]
pub enum Error {
    /// A series, metrics, or intent provider failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// The persistence sink rejected a write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Rejected input, including an invalid engine configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_provider() {
        let err = Error::Provider("trends backend unavailable".to_string());
        assert_eq!(err.to_string(), "Provider error: trends backend unavailable");
    }

    #[test]
    fn test_error_display_storage() {
        let err = Error::Storage("upsert rejected".to_string());
        assert_eq!(err.to_string(), "Storage error: upsert rejected");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("window_days must be greater than zero".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: window_days must be greater than zero"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_config_error() {
        let err: Error = ConfigError::Validation("threshold out of range".to_string()).into();
        assert!(err.to_string().starts_with("Configuration error:"));
        assert!(err.to_string().contains("threshold out of range"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
