// Standard filesystem adapter - Cross-platform file system operations

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use crate::domain::errors::DomainError;
use crate::ports::FsPort;

/// Filesystem adapter backed by the local disk
pub struct FsStdAdapter {
    working_dir: PathBuf,
}

impl FsStdAdapter {
    /// Create an adapter with its scratch directory under the system temp dir
    pub fn new() -> Result<Self, DomainError> {
        Self::with_working_dir(std::env::temp_dir().join("trimkit"))
    }

    /// Create an adapter with an explicit scratch directory
    pub fn with_working_dir(working_dir: PathBuf) -> Result<Self, DomainError> {
        std::fs::create_dir_all(&working_dir).map_err(|e| {
            DomainError::FsFail(format!("Failed to create working directory: {}", e))
        })?;
        Ok(Self { working_dir })
    }

    /// Root of the scratch directory
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

#[async_trait]
impl FsPort for FsStdAdapter {
    async fn exists(&self, path: &Path) -> Result<bool, DomainError> {
        Ok(path.exists())
    }

    async fn copy_to_working(
        &self,
        source: &Path,
        subfolder: &str,
    ) -> Result<PathBuf, DomainError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| DomainError::BadArgs("Source path has no file name".to_string()))?;

        let target_dir = self.working_dir.join(subfolder);
        tokio::fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to create folder: {}", e)))?;

        let target = target_dir.join(file_name);
        if target.exists() {
            // Replace any previous copy of the same file
            let _ = tokio::fs::remove_file(&target).await;
        }

        tokio::fs::copy(source, &target).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to copy {} into the working folder: {}",
                source.display(),
                e
            ))
        })?;
        debug!("copied {} to {}", source.display(), target.display());
        Ok(target)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to create directory: {}", e)))
    }

    async fn remove_file(&self, path: &Path) -> Result<(), DomainError> {
        if !path.exists() {
            return Ok(());
        }
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to delete file: {}", e)))
    }

    async fn enumerate_dir(&self, path: &Path) -> Result<Vec<PathBuf>, DomainError> {
        if !path.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<PathBuf> = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        entries.sort();
        Ok(entries)
    }

    async fn default_destination(&self) -> Result<PathBuf, DomainError> {
        // Prefer the user's Downloads folder; fall back to a scratch exports
        // folder when the host has none.
        let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
        if let Some(home) = home {
            let downloads = PathBuf::from(home).join("Downloads");
            if downloads.is_dir() {
                return Ok(downloads);
            }
        }

        let fallback = self.working_dir.join("exports");
        tokio::fs::create_dir_all(&fallback).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to create destination folder: {}", e))
        })?;
        Ok(fallback)
    }

    async fn reveal(&self, path: &Path) -> Result<(), DomainError> {
        // Opaque host hook; headless builds only record the request.
        debug!("reveal requested for {}", path.display());
        Ok(())
    }
}
