//! Error types for display surfaces

use std::io;
use thiserror::Error;

use crate::driver::DriverError;

/// Display error type
#[derive(Error, Debug)]
pub enum Error {
    /// The driver could not initialize for the requested configuration
    #[error("Failed to start display: {0}")]
    Start(#[from] DriverError),

    /// A write was attempted before a successful start
    #[error("Display not started")]
    NotStarted,

    /// Resolution string did not name a supported resolution
    #[error("Unsupported resolution: {0}")]
    InvalidResolution(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::NotStarted => io::Error::new(io::ErrorKind::NotConnected, err),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

/// Result type for display operations
pub type Result<T> = std::result::Result<T, Error>;
