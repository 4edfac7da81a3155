// File: src/error.rs
use thiserror::Error;

/// Failures at the settings import boundary.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload parsed but carries no `version`, or a version other than 1.
    #[error("Unrecognized format")]
    UnrecognizedFormat,
    /// The payload could not be parsed at all.
    #[error("Invalid JSON: {0}")]
    InvalidPayload(String),
    /// Reading or writing a settings file failed.
    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),
}
