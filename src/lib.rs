//! TrimKit - Lossless video trim session engine
//!
//! The core behind a trim-and-export tool: load a source file, keep a
//! start/end range valid while the user drags handles or snaps them to the
//! playhead, loop playback inside the range for preview, and export the
//! selection losslessly via container-level stream copy.
//!
//! Decoding, playback and muxing stay behind narrow ports
//! ([`ports::PlayerPort`], [`ports::ScannerPort`], [`ports::ExporterPort`]);
//! the crate owns the state machine, the clamping rules, the preview loop,
//! output naming and export orchestration. A GUI shell drives
//! [`TrimSession`] commands and renders its snapshots and events.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{DefaultAppContainer, EventSink, SessionEvent, SessionSnapshot, TrimSession};
pub use config::TrimConfig;
pub use domain::errors::DomainError;
pub use domain::model::{
    AssetProbe, ExportOutcome, ExportRequest, PlaybackState, SessionPhase, TrimRange, VideoAsset,
};
pub use error::{TrimError, TrimResult};

/// Initialize logging for hosts that have no subscriber of their own
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
