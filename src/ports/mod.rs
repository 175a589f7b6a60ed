// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::errors::DomainError;
use crate::domain::model::{AssetProbe, ExportOutcome, ExportRequest};

/// Port for source media scanning
#[async_trait]
pub trait ScannerPort: Send + Sync {
    /// Probe a media file for duration, size, dimensions and frame rate.
    ///
    /// Implementations apply orientation correction: when the video stream is
    /// rotated a quarter turn, width and height are swapped before reporting.
    async fn scan(&self, path: &Path) -> Result<AssetProbe, DomainError>;
}

/// Port for media playback.
///
/// Position reports travel on a watch channel so slow consumers only ever see
/// the latest value; the channel also carries positions landed by explicit
/// seeks, which makes a seek result authoritative until the next natural
/// report replaces it.
#[async_trait]
pub trait PlayerPort: Send + Sync {
    /// Load a media file for playback
    async fn load(&self, path: &Path) -> Result<(), DomainError>;

    /// Unload the current media and reset the position to zero
    async fn unload(&self);

    /// Start or resume playback
    async fn play(&self) -> Result<(), DomainError>;

    /// Pause playback
    async fn pause(&self) -> Result<(), DomainError>;

    /// Seek to a position in seconds; resolves once the seek lands and
    /// returns the effective (clamped) position
    async fn seek(&self, seconds: f64) -> Result<f64, DomainError>;

    /// Subscribe to periodic position reports in seconds
    fn positions(&self) -> watch::Receiver<f64>;

    /// Duration of the loaded media, if any
    async fn duration(&self) -> Option<f64>;

    /// Whether playback is currently running
    async fn is_playing(&self) -> bool;
}

/// Port for trimmed-range export
#[async_trait]
pub trait ExporterPort: Send + Sync {
    /// Run an export to its terminal outcome.
    ///
    /// Implementations must not leave a partial file behind on failure or
    /// cancellation.
    async fn export(&self, request: &ExportRequest) -> Result<ExportOutcome, DomainError>;

    /// Request cancellation of the in-flight export.
    ///
    /// Safe to call when no export is active and safe to call repeatedly. A
    /// cancel racing completion resolves in favor of whichever the exporter
    /// reports first.
    async fn cancel(&self);
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if a file exists
    async fn exists(&self, path: &Path) -> Result<bool, DomainError>;

    /// Copy a source file into the named working subfolder, replacing any
    /// previous copy, and return the local path
    async fn copy_to_working(
        &self,
        source: &Path,
        subfolder: &str,
    ) -> Result<PathBuf, DomainError>;

    /// Create a directory including parents
    async fn create_dir_all(&self, path: &Path) -> Result<(), DomainError>;

    /// Delete a file; succeeds when the file is already gone
    async fn remove_file(&self, path: &Path) -> Result<(), DomainError>;

    /// List the files directly inside a directory
    async fn enumerate_dir(&self, path: &Path) -> Result<Vec<PathBuf>, DomainError>;

    /// Default export destination folder
    async fn default_destination(&self) -> Result<PathBuf, DomainError>;

    /// Reveal a file in the platform file manager (opaque host hook)
    async fn reveal(&self, path: &Path) -> Result<(), DomainError>;
}
