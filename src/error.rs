//! # Error Types
//!
//! Custom error types for the UR primary client using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the UR primary client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but holds an out-of-range value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Custom reports were requested but the watch list does not exist
    #[error("Watch list not found: {}", .0.display())]
    MissingWatchList(PathBuf),

    /// Malformed watch list line
    #[error("Watch list line {line}: {reason}")]
    WatchList { line: usize, reason: String },

    /// A package on the stream was not valid JSON
    #[error("Package decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Connection to the controller failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the UR primary client
pub type Result<T> = std::result::Result<T, ClientError>;
