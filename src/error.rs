//! Error types

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Address could not be parsed
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connection(String),

    /// Connection attempt exceeded the configured connect timeout
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),

    /// Protocol violation during the connection handshake
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Authentication rejected by the server
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Keyspace rejected by the server
    #[error("invalid keyspace: {0}")]
    InvalidKeyspace(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid state transition
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },

    /// Settings could not be deserialized
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Critical errors will fail again on every retry against the same host
    /// (bad credentials, unsupported protocol, unknown keyspace).
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Error::Protocol(_) | Error::Authentication(_) | Error::InvalidKeyspace(_)
        )
    }

    /// Stable category name, used as a metrics label
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::InvalidAddress(_) => "invalid_address",
            Error::Connection(_) => "connection",
            Error::Timeout(_) => "timeout",
            Error::Protocol(_) => "protocol",
            Error::Authentication(_) => "authentication",
            Error::InvalidKeyspace(_) => "invalid_keyspace",
            Error::Config(_) => "config",
            Error::InvalidState { .. } => "invalid_state",
            Error::Json(_) => "json",
        }
    }
}
