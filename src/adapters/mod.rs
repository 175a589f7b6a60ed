// Adapters - External system implementations

pub mod ffmpeg_export;
pub mod ffprobe_scan;
pub mod fs_std;
pub mod sim_player;

// Re-export adapters
pub use ffmpeg_export::FfmpegExportAdapter;
pub use ffprobe_scan::FfprobeScanAdapter;
pub use fs_std::FsStdAdapter;
pub use sim_player::SimPlayerAdapter;
