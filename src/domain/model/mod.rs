// Domain models - Core types and data structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::rules::AssetLimits;
use crate::utils::time::{format_clock, format_size};

/// Raw result of scanning a source file.
///
/// Width and height are already orientation-corrected by the scanner: when the
/// stream carries a quarter-turn rotation, the scanner swaps the reported
/// dimensions before building the probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetProbe {
    pub duration_secs: f64,
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// Immutable description of a loaded source file.
///
/// Created once per successful scan, never mutated, replaced wholesale when a
/// new file is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub path: PathBuf,
    pub duration_secs: f64,
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub is_valid: bool,
    pub invalid_reason: Option<String>,
}

impl VideoAsset {
    /// Build an asset from a scan result, evaluating it against the limits.
    pub fn from_probe(path: PathBuf, probe: AssetProbe, limits: &AssetLimits) -> Self {
        let is_valid = limits.is_within(&probe);
        let invalid_reason = if is_valid {
            None
        } else {
            limits.invalid_reason(&probe)
        };

        Self {
            path,
            duration_secs: probe.duration_secs,
            size_bytes: probe.size_bytes,
            width: probe.width,
            height: probe.height,
            frame_rate: probe.frame_rate,
            is_valid,
            invalid_reason,
        }
    }

    /// File name component of the source path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Resolution as a "WxH" display string
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Duration formatted for display (no milliseconds)
    pub fn formatted_duration(&self) -> String {
        format_clock(self.duration_secs)
    }

    /// Byte size formatted for display
    pub fn formatted_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Selected trim interval in seconds.
///
/// The mutators never reject a candidate value; they clamp it and, when the
/// move would invert the range or collapse it below the minimum gap, they drag
/// the other handle along so the invariants keep holding. This is what keeps
/// timeline handle dragging continuous instead of freezing at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    /// Create a range spanning the full asset duration
    pub fn full(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: duration,
        }
    }

    /// Selected duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether a playhead time falls inside the range (inclusive)
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Reset to the full asset duration
    pub fn set_full(&mut self, duration: f64) {
        self.start = 0.0;
        self.end = duration;
    }

    /// Move the start handle.
    ///
    /// The candidate is clamped to `[0, max_duration]`. If keeping the minimum
    /// gap would push the end past `max_duration`, the whole range is pinned to
    /// the last legal window. If it would push the end past the current end,
    /// the end is dragged forward to preserve the gap.
    pub fn set_start(&mut self, time: f64, max_duration: f64, min_gap: f64) {
        let clamped = time.clamp(0.0, max_duration);
        let new_end = clamped + min_gap;

        if new_end > max_duration {
            self.start = max_duration - min_gap;
            self.end = max_duration;
        } else if new_end > self.end {
            self.start = clamped;
            self.end = new_end;
        } else {
            self.start = clamped;
        }
    }

    /// Move the end handle.
    ///
    /// Mirror of [`set_start`](Self::set_start): the candidate is clamped to
    /// `[min_gap, max_duration]`; a new end that would land the start below
    /// zero pins the range to `[0, min_gap]`; one that undercuts the current
    /// start drags the start back to preserve the gap.
    pub fn set_end(&mut self, time: f64, max_duration: f64, min_gap: f64) {
        let clamped = time.clamp(min_gap, max_duration);
        let new_start = clamped - min_gap;

        if new_start < 0.0 {
            self.start = 0.0;
            self.end = min_gap;
        } else if new_start < self.start {
            self.end = clamped;
            self.start = new_start;
        } else {
            self.end = clamped;
        }
    }

    /// Check all range invariants against an asset duration
    pub fn is_valid_for(&self, duration: f64, min_gap: f64) -> bool {
        self.start >= 0.0
            && self.end <= duration
            && self.end > self.start
            && self.duration() >= min_gap
    }
}

/// Mutable playback state owned by the session.
///
/// `current_time` is driven by periodic position reports from the player and
/// by explicit seeks; a seek's landed position is authoritative until the next
/// natural report supersedes it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_time: f64,
    pub is_playing: bool,
    pub is_preview_mode: bool,
}

/// Lifecycle phase of a trim session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No asset loaded
    Idle,
    /// Asset loaded, range covers the full duration
    Ready,
    /// Range has been user-modified
    Editing,
    /// Preview loop active
    Previewing,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

/// Request handed to the exporter: source, a range snapshot, and the resolved
/// output path.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub source: PathBuf,
    pub range: TrimRange,
    pub output: PathBuf,
}

/// Terminal outcome of an export attempt.
///
/// Cancellation is a distinct outcome, not a failure, so hosts can message it
/// differently. The resulting duration is read back from the written file and
/// may differ from the requested range because stream-copy trimming aligns to
/// container keyframes; it is `None` when the read-back probe fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ExportOutcome {
    Completed {
        output: PathBuf,
        duration_secs: Option<f64>,
    },
    Cancelled,
    Failed {
        reason: String,
    },
}

impl ExportOutcome {
    /// Whether the export produced an output file
    pub fn is_completed(&self) -> bool {
        matches!(self, ExportOutcome::Completed { .. })
    }
}
