//! Error types for swanctl-complete

use thiserror::Error;

/// Main error type for swanctl-complete
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed completion request: {0}")]
    Malformed(String),

    #[error("Control plane not available: {0}")]
    Session(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
