//! Error types for the API client.

use std::fmt;

/// Errors that can occur when fetching a quote.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or the response body could not be read.
    #[error("Network error: {0}")]
    Network(String),
    /// The handshake and data request did not complete within the fetch timeout.
    #[error("Request timed out")]
    Timeout,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not the expected quote document.
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// The symbol could not be placed into a request URL.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
}

/// Coarse failure classification reported at the per-symbol boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Network,
    Timeout,
    Upstream,
    Parse,
}

impl Error {
    /// Classifies this error for logging and cycle reports.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Network,
            Self::Timeout => FailureKind::Timeout,
            Self::HttpStatus { .. } => FailureKind::Upstream,
            Self::Parse(_) | Self::InvalidSymbol(_) => FailureKind::Parse,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Upstream => "http-status",
            Self::Parse => "parse",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_each_variant() {
        assert_eq!(Error::Network("reset".into()).kind(), FailureKind::Network);
        assert_eq!(Error::Timeout.kind(), FailureKind::Timeout);
        assert_eq!(
            Error::HttpStatus {
                status: 503,
                body: String::new()
            }
            .kind(),
            FailureKind::Upstream
        );
        assert_eq!(Error::Parse("eof".into()).kind(), FailureKind::Parse);
    }

    #[test]
    fn failure_kind_display() {
        assert_eq!(FailureKind::Upstream.to_string(), "http-status");
        assert_eq!(FailureKind::Timeout.to_string(), "timeout");
    }
}
