//! FFprobe scan adapter
//!
//! Probes media files by running the `ffprobe` executable with JSON output.
//! The decode stack itself stays outside the process boundary; this adapter
//! only parses what ffprobe reports.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::AssetProbe;
use crate::ports::ScannerPort;

/// FFprobe-based scanner adapter
pub struct FfprobeScanAdapter {
    ffprobe_bin: String,
}

impl Default for FfprobeScanAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeScanAdapter {
    /// Create an adapter using `ffprobe` from the PATH
    pub fn new() -> Self {
        Self::with_binary("ffprobe")
    }

    /// Create an adapter using a specific ffprobe binary
    pub fn with_binary(ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
        }
    }
}

#[async_trait]
impl ScannerPort for FfprobeScanAdapter {
    async fn scan(&self, path: &Path) -> Result<AssetProbe, DomainError> {
        if !path.exists() {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }

        let output = Command::new(&self.ffprobe_bin)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| DomainError::ScanFail(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::ScanFail(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let report: ProbeReport = serde_json::from_slice(&output.stdout)
            .map_err(|e| DomainError::ScanFail(format!("Unreadable ffprobe output: {}", e)))?;

        let probe = report.into_probe()?;
        debug!(
            "scanned {}: {:.3}s, {}x{} @ {:.2} fps",
            path.display(),
            probe.duration_secs,
            probe.width,
            probe.height,
            probe.frame_rate
        );
        Ok(probe)
    }
}

// --- ffprobe JSON shapes ----------------------------------------------------

#[derive(Debug, Deserialize)]
struct ProbeReport {
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    tags: Option<ProbeStreamTags>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProbeStreamTags {
    rotate: Option<String>,
}

impl ProbeReport {
    fn into_probe(self) -> Result<AssetProbe, DomainError> {
        let format = self
            .format
            .ok_or_else(|| DomainError::ScanFail("ffprobe reported no format".to_string()))?;
        let duration_secs = format
            .duration
            .as_deref()
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(0.0);
        let size_bytes = format
            .size
            .as_deref()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(0);

        let video = self
            .streams
            .iter()
            .find(|stream| stream.codec_type.as_deref() == Some("video"));

        let (width, height, frame_rate) = match video {
            Some(stream) => {
                let mut width = stream.width.unwrap_or(0);
                let mut height = stream.height.unwrap_or(0);
                // A quarter-turn rotation means the natural dimensions are
                // transposed relative to presentation.
                if stream.is_quarter_turned() {
                    std::mem::swap(&mut width, &mut height);
                }
                (width, height, stream.frame_rate())
            }
            None => (0, 0, 0.0),
        };

        Ok(AssetProbe {
            duration_secs,
            size_bytes,
            width,
            height,
            frame_rate,
        })
    }
}

impl ProbeStream {
    fn rotation(&self) -> Option<f64> {
        if let Some(side_data) = self
            .side_data_list
            .iter()
            .find_map(|entry| entry.rotation)
        {
            return Some(side_data);
        }
        self.tags
            .as_ref()
            .and_then(|tags| tags.rotate.as_deref())
            .and_then(|value| value.parse::<f64>().ok())
    }

    fn is_quarter_turned(&self) -> bool {
        match self.rotation() {
            Some(rotation) => (rotation.abs() as i64) % 180 == 90,
            None => false,
        }
    }

    fn frame_rate(&self) -> f64 {
        let Some(raw) = self.avg_frame_rate.as_deref() else {
            return 0.0;
        };
        match raw.split_once('/') {
            Some((num, den)) => {
                let num = num.parse::<f64>().unwrap_or(0.0);
                let den = den.parse::<f64>().unwrap_or(0.0);
                if den > 0.0 {
                    num / den
                } else {
                    0.0
                }
            }
            None => raw.parse::<f64>().unwrap_or(0.0),
        }
    }
}
