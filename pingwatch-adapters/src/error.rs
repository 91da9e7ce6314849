//! Error types for adapters.

use thiserror::Error;

/// Broad class of an [`AdapterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a usable response (network, HTTP, auth).
    Transport,
    /// A response arrived but reported failure or could not be understood.
    Protocol,
}

/// Errors that can occur when fetching statuses from a backend.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Reading a local status source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Backend answered with a failure discriminator.
    #[error("Backend reported failure: {0}")]
    Rejected(String),

    /// Success response without an account list.
    #[error("Status response contains no accounts")]
    MissingEntities,

    /// Operation not supported by this source.
    #[error("Not supported: {0}")]
    Unsupported(String),
}

impl AdapterError {
    /// Whether this is a transport or a protocol failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Http(_)
            | AdapterError::Auth(_)
            | AdapterError::Connection(_)
            | AdapterError::Timeout
            | AdapterError::Io(_)
            | AdapterError::Unsupported(_) => ErrorKind::Transport,
            AdapterError::Parse(_) | AdapterError::Rejected(_) | AdapterError::MissingEntities => {
                ErrorKind::Protocol
            }
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Parse(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else if err.is_decode() {
            AdapterError::Parse(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(AdapterError::Timeout.kind(), ErrorKind::Transport);
        assert_eq!(
            AdapterError::Http("502".to_string()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(AdapterError::MissingEntities.kind(), ErrorKind::Protocol);
        assert_eq!(
            AdapterError::Rejected("db down".to_string()).kind(),
            ErrorKind::Protocol
        );
    }

    #[test]
    fn test_json_error_is_protocol() {
        let err: AdapterError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }
}
