//! Core engines: preview looping and export orchestration

pub mod export;
pub mod preview;

pub use export::ExportOrchestrator;
pub use preview::PreviewLoop;
