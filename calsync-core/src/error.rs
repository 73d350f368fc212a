//! Error types for calsync.

use thiserror::Error;

/// Errors that can occur while relaying calendar events.
#[derive(Error, Debug)]
pub enum CalSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unrecognized calendar provider '{provider}' for destination '{destination}'")]
    UnknownProvider {
        destination: String,
        provider: String,
    },

    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    #[error("Cannot translate event: {0}")]
    Translation(String),
}

/// Result type alias for calsync operations.
pub type CalSyncResult<T> = Result<T, CalSyncError>;
