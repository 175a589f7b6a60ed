//! Session events and sinks
//!
//! The session publishes state changes through registered sinks instead of an
//! implicit observation mechanism; a rendering layer subscribes and re-renders
//! from snapshots.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::model::ExportOutcome;

/// Observable session state change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    AssetLoaded { path: PathBuf, duration_secs: f64 },
    LoadFailed { message: String },
    RangeChanged { start: f64, end: f64 },
    PositionChanged { seconds: f64 },
    PlaybackChanged { is_playing: bool },
    PreviewModeChanged { enabled: bool },
    ExportStarted { output: PathBuf },
    ExportFinished { outcome: ExportOutcome },
    StateReset,
}

/// Receiver for session events
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// Sink that maps events onto tracing levels
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::LoadFailed { message } => warn!("load failed: {}", message),
            SessionEvent::ExportFinished {
                outcome: ExportOutcome::Failed { reason },
            } => warn!("export failed: {}", reason),
            SessionEvent::PositionChanged { seconds } => debug!("position: {:.3}", seconds),
            other => info!("{:?}", other),
        }
    }
}

/// Sink that prints one JSON object per event to stdout, for structured hosts
pub struct JsonEventSink;

impl EventSink for JsonEventSink {
    fn on_event(&self, event: &SessionEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{}", line);
        }
    }
}

/// Sink that discards every event
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn on_event(&self, _event: &SessionEvent) {}
}
