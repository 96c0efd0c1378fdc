//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding configuration, I/O and input validation failures.
#[derive(Debug)]
pub enum StockWatchError {
    /// An error from the underlying quote API client.
    Api(nse_quote_api::Error),
    /// The configuration file is unusable (unknown format, no symbols, ...).
    Config(String),
    /// Reading the configuration file failed.
    Io(std::io::Error),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// TOML deserialization failed.
    Toml(toml::de::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for StockWatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Toml(e) => write!(f, "TOML error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for StockWatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<nse_quote_api::Error> for StockWatchError {
    fn from(e: nse_quote_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<std::io::Error> for StockWatchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StockWatchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<toml::de::Error> for StockWatchError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}
