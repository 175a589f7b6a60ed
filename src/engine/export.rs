//! Export orchestration
//!
//! Thin layer between the session and the exporter: resolves a collision-free
//! output path, enforces that only one export runs at a time, and forwards
//! cancellation. The heavy lifting stays behind [`ExporterPort`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::{ExportOutcome, ExportRequest};
use crate::output::NamingResolver;
use crate::ports::ExporterPort;

/// Orchestrates export attempts against the exporter port
pub struct ExportOrchestrator {
    exporter: Arc<dyn ExporterPort>,
    naming: NamingResolver,
    active: AtomicBool,
}

impl ExportOrchestrator {
    /// Create an orchestrator around an exporter
    pub fn new(exporter: Arc<dyn ExporterPort>, naming: NamingResolver) -> Self {
        Self {
            exporter,
            naming,
            active: AtomicBool::new(false),
        }
    }

    /// Whether an export is currently in flight
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Resolve a free output path in the destination folder, reusing the
    /// source's own extension
    pub fn resolve_output(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<PathBuf, DomainError> {
        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        self.naming
            .resolve(source, destination, extension.as_deref())
    }

    /// Run an export to its terminal outcome.
    ///
    /// Only one export may be in flight; a second call while active fails
    /// without touching the exporter.
    pub async fn export(&self, request: &ExportRequest) -> Result<ExportOutcome, DomainError> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(DomainError::ExportFail(
                "An export is already in progress".to_string(),
            ));
        }

        info!(
            "starting export of [{:.3}, {:.3}] from {} to {}",
            request.range.start,
            request.range.end,
            request.source.display(),
            request.output.display()
        );

        let result = self.exporter.export(request).await;
        self.active.store(false, Ordering::SeqCst);

        match &result {
            Ok(outcome) => debug!("export finished: {:?}", outcome),
            Err(e) => debug!("export errored: {}", e),
        }
        result
    }

    /// Forward a cancellation request to the exporter.
    ///
    /// Callable when idle and callable repeatedly; a cancel racing completion
    /// resolves in favor of whichever the exporter reports first.
    pub async fn cancel(&self) {
        self.exporter.cancel().await;
    }
}
