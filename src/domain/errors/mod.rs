// Domain errors - Error types for the domain layer and ports

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// File format not supported
    UnsupportedFormat(String),
    /// Media scanning failed
    ScanFail(String),
    /// Playback operation failed
    PlaybackFail(String),
    /// Export operation failed
    ExportFail(String),
    /// Filesystem operation failed
    FsFail(String),
    /// Unique-name resolution exhausted its attempt budget
    NamingExhausted(usize),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            DomainError::ScanFail(msg) => write!(f, "Scan failed: {}", msg),
            DomainError::PlaybackFail(msg) => write!(f, "Playback failed: {}", msg),
            DomainError::ExportFail(msg) => write!(f, "Export failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "Filesystem failure: {}", msg),
            DomainError::NamingExhausted(attempts) => {
                write!(f, "No free output name after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for DomainError {}
