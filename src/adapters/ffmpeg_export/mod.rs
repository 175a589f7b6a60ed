//! FFmpeg export adapter
//!
//! Runs the `ffmpeg` executable in stream-copy mode: the selected range is
//! cut at the container level without re-encoding. Output goes to a staging
//! temp file first and is only moved to the final path on success, so a
//! failed or cancelled export never leaves a partial file behind.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{ExportOutcome, ExportRequest};
use crate::ports::{ExporterPort, ScannerPort};

/// Maximum number of stderr lines kept for a failure reason
const STDERR_TAIL_LINES: usize = 4;

/// FFmpeg-based exporter adapter
pub struct FfmpegExportAdapter {
    ffmpeg_bin: String,
    scanner: Arc<dyn ScannerPort>,
    cancel: watch::Sender<u64>,
}

impl FfmpegExportAdapter {
    /// Create an adapter using `ffmpeg` from the PATH.
    ///
    /// The scanner is used to read the resulting duration back from the
    /// written file; keyframe alignment under stream copy means it need not
    /// equal the requested range.
    pub fn new(scanner: Arc<dyn ScannerPort>) -> Self {
        Self::with_binary("ffmpeg", scanner)
    }

    /// Create an adapter using a specific ffmpeg binary
    pub fn with_binary(ffmpeg_bin: impl Into<String>, scanner: Arc<dyn ScannerPort>) -> Self {
        let (cancel, _) = watch::channel(0);
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            scanner,
            cancel,
        }
    }

    fn staging_path(output: &Path) -> Result<tempfile::TempPath, DomainError> {
        let parent = output
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .ok_or_else(|| {
                DomainError::BadArgs("Output path has no parent directory".to_string())
            })?;
        let extension = output
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let staging = tempfile::Builder::new()
            .prefix(".trimkit-")
            .suffix(&extension)
            .tempfile_in(parent)
            .map_err(|e| DomainError::FsFail(format!("Failed to create staging file: {}", e)))?;
        Ok(staging.into_temp_path())
    }
}

#[async_trait]
impl ExporterPort for FfmpegExportAdapter {
    async fn export(&self, request: &ExportRequest) -> Result<ExportOutcome, DomainError> {
        let mut cancel_rx = self.cancel.subscribe();
        cancel_rx.borrow_and_update();

        let staging = Self::staging_path(&request.output)?;
        let duration = request.range.duration();

        // Input-side -ss lands on the previous keyframe, which is what keeps
        // stream copy lossless; -t then bounds the output duration.
        let mut child = Command::new(&self.ffmpeg_bin)
            .args(["-nostdin", "-hide_banner", "-loglevel", "error", "-y"])
            .arg("-ss")
            .arg(format!("{:.6}", request.range.start))
            .arg("-i")
            .arg(&request.source)
            .arg("-t")
            .arg(format!("{:.6}", duration))
            .args(["-map", "0", "-c", "copy", "-avoid_negative_ts", "make_zero"])
            .arg(staging.as_os_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DomainError::ExportFail(format!("Failed to run ffmpeg: {}", e)))?;

        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buffer = String::new();
            if let Some(mut pipe) = stderr {
                let _ = pipe.read_to_string(&mut buffer).await;
            }
            buffer
        });

        let status = tokio::select! {
            status = child.wait() => status
                .map_err(|e| DomainError::ExportFail(format!("ffmpeg did not finish: {}", e)))?,
            _ = cancel_rx.changed() => {
                debug!("export cancelled, killing ffmpeg");
                if let Err(e) = child.start_kill() {
                    warn!("failed to kill ffmpeg: {}", e);
                }
                let _ = child.wait().await;
                stderr_task.abort();
                // Dropping the staging path removes the partial file
                return Ok(ExportOutcome::Cancelled);
            }
        };

        let log = stderr_task.await.unwrap_or_default();

        if status.success() {
            staging.persist(&request.output).map_err(|e| {
                DomainError::FsFail(format!("Failed to move export into place: {}", e))
            })?;
            let duration_secs = self
                .scanner
                .scan(&request.output)
                .await
                .ok()
                .map(|probe| probe.duration_secs);
            Ok(ExportOutcome::Completed {
                output: request.output.clone(),
                duration_secs,
            })
        } else {
            let tail: Vec<&str> = log
                .lines()
                .rev()
                .take(STDERR_TAIL_LINES)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            let reason = if tail.is_empty() {
                format!("ffmpeg exited with {}", status)
            } else {
                tail.join("; ")
            };
            Ok(ExportOutcome::Failed { reason })
        }
    }

    async fn cancel(&self) {
        self.cancel.send_modify(|generation| *generation += 1);
    }
}
