//! Error handling module for TrimKit

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for TrimKit operations
#[derive(Error, Debug)]
pub enum TrimError {
    /// Invalid trim range or asset state
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Source file could not be scanned
    #[error("Failed to scan media file: {message}")]
    Scan { message: String },

    /// Playback operation failed
    #[error("Playback error: {message}")]
    Playback { message: String },

    /// Export operation failed
    #[error("Export failed: {message}")]
    Export { message: String },

    /// Unique-name resolution gave up
    #[error("Could not find a free output name after {attempts} attempts")]
    NamingExhausted { attempts: usize },

    /// Filesystem operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DomainError> for TrimError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::BadArgs(message) => TrimError::Validation { message },
            DomainError::FileNotFound(message) => TrimError::Filesystem { message },
            DomainError::UnsupportedFormat(message) => TrimError::Scan { message },
            DomainError::ScanFail(message) => TrimError::Scan { message },
            DomainError::PlaybackFail(message) => TrimError::Playback { message },
            DomainError::ExportFail(message) => TrimError::Export { message },
            DomainError::FsFail(message) => TrimError::Filesystem { message },
            DomainError::NamingExhausted(attempts) => TrimError::NamingExhausted { attempts },
        }
    }
}

/// Result type alias for TrimKit operations
pub type TrimResult<T> = std::result::Result<T, TrimError>;
