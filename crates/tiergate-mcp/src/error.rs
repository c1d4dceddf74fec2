//! Error types for the MCP crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Invalid gateway configuration.
    #[error("invalid gateway configuration: {0}")]
    Config(String),

    /// Transport error.
    #[error("transport error: {0}")]
    TransportError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Why the role callback produced no decision. Every variant falls back to
/// the public tier.
#[derive(Debug, Error)]
pub enum RoleLookupError {
    /// The role endpoint did not answer in time.
    #[error("role endpoint timed out")]
    Timeout,

    /// Connect or protocol failure.
    #[error("role endpoint unreachable: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("role endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// Body was not a role response.
    #[error("could not decode role response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RoleLookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RoleLookupError::Timeout
        } else if e.is_decode() {
            RoleLookupError::Decode(e.to_string())
        } else {
            RoleLookupError::Transport(e.to_string())
        }
    }
}

/// A content file could not be read.
#[derive(Debug, Error)]
#[error("failed to read {}: {source}", path.display())]
pub struct ResourceReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
