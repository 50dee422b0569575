pub mod catalog;
pub mod cooking;
pub mod frontend;
pub mod integration;
pub mod speech;
pub mod storage;
pub mod utils;
pub mod voice;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CookeaseError {
    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl From<std::io::Error> for CookeaseError {
    fn from(e: std::io::Error) -> Self {
        CookeaseError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for CookeaseError {
    fn from(e: serde_json::Error) -> Self {
        CookeaseError::ParseError(e.to_string())
    }
}

impl From<reqwest::Error> for CookeaseError {
    fn from(e: reqwest::Error) -> Self {
        CookeaseError::NetworkError(e.to_string())
    }
}

impl CookeaseError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The cache or an empty catalog takes over
            CookeaseError::CatalogError(_) => true,
            CookeaseError::CacheError(_) => true,
            CookeaseError::ParseError(_) => true,
            CookeaseError::NetworkError(_) => true,
            CookeaseError::IOError(_) => false,
            // The tone is best-effort
            CookeaseError::AudioDeviceError(_) => true,
            CookeaseError::ConfigError(_) => false,
            CookeaseError::ChannelError(_) => false,
            CookeaseError::SessionError(_) => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            CookeaseError::CatalogError(_) => {
                "Could not load recipes. Please try again.".to_string()
            }
            CookeaseError::CacheError(_) => {
                "Saved recipes are unavailable.".to_string()
            }
            CookeaseError::ParseError(_) => {
                "The recipe file could not be read.".to_string()
            }
            CookeaseError::NetworkError(_) => {
                "Recipe server is unreachable. Check your connection.".to_string()
            }
            CookeaseError::IOError(_) => "File system error occurred.".to_string(),
            CookeaseError::AudioDeviceError(_) => {
                "Audio output is unavailable. Alerts will be shown as text.".to_string()
            }
            CookeaseError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            CookeaseError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            CookeaseError::SessionError(_) => {
                "Cooking session error. Please try again.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CookeaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(CookeaseError::NetworkError("timeout".into()).is_recoverable());
        assert!(CookeaseError::AudioDeviceError("no device".into()).is_recoverable());
        assert!(!CookeaseError::ConfigError("bad".into()).is_recoverable());
        assert!(!CookeaseError::ChannelError("closed".into()).is_recoverable());
    }

    #[test]
    fn test_user_message_hides_details() {
        let error = CookeaseError::ConfigError("words_per_minute must be positive".into());
        assert_eq!(error.user_message(), "Configuration error. Please check settings.");

        let io: CookeaseError = std::io::Error::other("disk full").into();
        assert!(matches!(io, CookeaseError::IOError(_)));
        assert_eq!(io.user_message(), "File system error occurred.");
    }
}
