// Session configuration - Limits and tunables, optionally loaded from TOML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::rules::AssetLimits;

/// Default maximum source size: 1 GB
const DEFAULT_MAX_FILE_SIZE: u64 = 1_073_741_824;

/// Default maximum source duration: 120 minutes
const DEFAULT_MAX_DURATION_SECS: f64 = 7200.0;

/// Minimum selectable trim duration: 100 ms
const DEFAULT_MIN_TRIM_DURATION: f64 = 0.1;

/// Skip step for the forward/backward commands: 1/3 second
const DEFAULT_SKIP_DURATION: f64 = 0.333;

/// Offset added after a preview-loop seek so the landed position does not
/// immediately re-trigger the boundary check
const DEFAULT_REWIND_BUFFER: f64 = 0.1;

/// Session limits and tunables.
///
/// `Default` mirrors the built-in constants; hosts can override any field
/// through a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrimConfig {
    /// Maximum source file size in bytes
    pub max_file_size: u64,
    /// Maximum source duration in seconds
    pub max_duration_secs: f64,
    /// Minimum trim range duration in seconds
    pub min_trim_duration: f64,
    /// Skip step in seconds for skip commands
    pub skip_duration: f64,
    /// Seconds added past the range start after a preview-loop rewind
    pub rewind_buffer: f64,
    /// Debounce window for the play/pause toggle, in milliseconds
    pub toggle_debounce_ms: u64,
    /// Minimum interval between emitted position events, in milliseconds
    pub position_event_interval_ms: u64,
    /// Attempt budget for the unique-name resolver
    pub naming_max_attempts: usize,
    /// Accepted source file extensions (lowercase)
    pub supported_formats: Vec<String>,
    /// Subfolder of the working directory that receives source copies
    pub working_subdir: String,
    /// Export destination folder; when unset the filesystem adapter picks one
    pub destination_dir: Option<PathBuf>,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            min_trim_duration: DEFAULT_MIN_TRIM_DURATION,
            skip_duration: DEFAULT_SKIP_DURATION,
            rewind_buffer: DEFAULT_REWIND_BUFFER,
            toggle_debounce_ms: 100,
            position_event_interval_ms: 100,
            naming_max_attempts: 1000,
            supported_formats: ["mp4", "mov", "avi", "mkv", "m4v"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            working_subdir: "videos".to_string(),
            destination_dir: None,
        }
    }
}

impl TrimConfig {
    /// Parse a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse config: {}", e)))
    }

    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Check that the configured values are mutually consistent
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.min_trim_duration <= 0.0 {
            return Err(DomainError::BadArgs(
                "min_trim_duration must be positive".to_string(),
            ));
        }
        if self.max_duration_secs <= self.min_trim_duration {
            return Err(DomainError::BadArgs(
                "max_duration_secs must exceed min_trim_duration".to_string(),
            ));
        }
        if self.rewind_buffer < 0.0 {
            return Err(DomainError::BadArgs(
                "rewind_buffer cannot be negative".to_string(),
            ));
        }
        if self.naming_max_attempts == 0 {
            return Err(DomainError::BadArgs(
                "naming_max_attempts must be at least 1".to_string(),
            ));
        }
        if self.supported_formats.is_empty() {
            return Err(DomainError::BadArgs(
                "supported_formats cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a path carries a supported extension (case-insensitive)
    pub fn is_supported_format(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map(|ext| self.supported_formats.iter().any(|s| s == &ext))
            .unwrap_or(false)
    }

    /// Asset limits derived from this configuration
    pub fn asset_limits(&self) -> AssetLimits {
        AssetLimits {
            max_file_size: self.max_file_size,
            max_duration_secs: self.max_duration_secs,
        }
    }
}
