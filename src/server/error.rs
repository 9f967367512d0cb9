//! Error types for the HTTP server.

use thiserror::Error;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration cannot be used to start a server.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
