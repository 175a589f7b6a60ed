//! Unique output name resolution
//!
//! Derives `{stem}_trimmed.{ext}` style names from a source path, probing the
//! destination folder with read-only existence checks until a free name is
//! found. Checks are synchronous; the resolver performs no writes.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::domain::errors::DomainError;

/// Suffix appended to the source stem
const TRIMMED_SUFFIX: &str = "_trimmed";

/// Default attempt budget before resolution gives up
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Resolver for collision-free output file names
#[derive(Debug, Clone, Copy)]
pub struct NamingResolver {
    max_attempts: usize,
}

impl Default for NamingResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl NamingResolver {
    /// Create a resolver with a custom attempt budget
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Resolve a free output path inside `folder`.
    ///
    /// The name starts from `{stem}_trimmed.{ext}` and appends `_1`, `_2`, …
    /// until no file exists at the candidate path. `preferred_extension` wins
    /// when non-empty, otherwise the source extension is reused.
    pub fn resolve(
        &self,
        source: &Path,
        folder: &Path,
        preferred_extension: Option<&str>,
    ) -> Result<PathBuf, DomainError> {
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                DomainError::BadArgs("Source path has no file name".to_string())
            })?;
        let base = format!("{}{}", stem, TRIMMED_SUFFIX);
        let extension = self.pick_extension(source, preferred_extension);

        let mut candidate = folder.join(file_name(&base, &extension));
        let mut counter = 0;

        while candidate.exists() {
            counter += 1;
            if counter >= self.max_attempts {
                debug!(
                    "naming resolver exhausted after {} attempts in {}",
                    self.max_attempts,
                    folder.display()
                );
                return Err(DomainError::NamingExhausted(self.max_attempts));
            }
            candidate = folder.join(file_name(&format!("{}_{}", base, counter), &extension));
        }

        Ok(candidate)
    }

    /// Build a timestamped name without touching the filesystem:
    /// `{stem}_trimmed_{YYYYMMDDHHMMSS}.{ext}`
    pub fn timestamped_name(&self, source: &Path, extension: Option<&str>) -> String {
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = self.pick_extension(source, extension);
        let timestamp = Local::now().format("%Y%m%d%H%M%S");

        file_name(&format!("{}{}_{}", stem, TRIMMED_SUFFIX, timestamp), &extension)
    }

    fn pick_extension(&self, source: &Path, preferred: Option<&str>) -> String {
        match preferred {
            Some(ext) if !ext.is_empty() => ext.to_string(),
            _ => source
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

fn file_name(base: &str, extension: &str) -> String {
    if extension.is_empty() {
        base.to_string()
    } else {
        format!("{}.{}", base, extension)
    }
}
