//! Integration tests for the trim session command surface
//!
//! The session runs against scripted collaborators: a scanner with
//! pre-registered probes, a player that records every command it receives,
//! and an exporter with a configurable terminal outcome.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use trimkit::domain::errors::DomainError;
use trimkit::ports::{ExporterPort, FsPort, PlayerPort, ScannerPort};
use trimkit::{
    AssetProbe, EventSink, ExportOutcome, ExportRequest, SessionEvent, SessionPhase, TrimConfig,
    TrimSession,
};

// --- Scripted collaborators -------------------------------------------------

struct StubScanner {
    probes: Mutex<HashMap<PathBuf, AssetProbe>>,
    delay: Mutex<Duration>,
}

impl StubScanner {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            probes: Mutex::new(HashMap::new()),
            delay: Mutex::new(Duration::ZERO),
        })
    }

    fn register(&self, path: &str, duration_secs: f64) {
        self.probes.lock().unwrap().insert(
            PathBuf::from(path),
            AssetProbe {
                duration_secs,
                size_bytes: 1024,
                width: 1920,
                height: 1080,
                frame_rate: 30.0,
            },
        );
    }

    fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl ScannerPort for StubScanner {
    async fn scan(&self, path: &Path) -> Result<AssetProbe, DomainError> {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.probes
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| DomainError::ScanFail(format!("no probe for {}", path.display())))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PlayerCommand {
    Load(PathBuf),
    Play,
    Pause,
    Seek(f64),
    Unload,
}

struct TestPlayer {
    position: watch::Sender<f64>,
    playing: Mutex<bool>,
    commands: Mutex<Vec<PlayerCommand>>,
}

impl TestPlayer {
    fn new() -> Arc<Self> {
        let (position, _) = watch::channel(0.0);
        Arc::new(Self {
            position,
            playing: Mutex::new(false),
            commands: Mutex::new(Vec::new()),
        })
    }

    fn report(&self, seconds: f64) {
        self.position.send_replace(seconds);
    }

    fn commands(&self) -> Vec<PlayerCommand> {
        self.commands.lock().unwrap().clone()
    }

    fn clear_commands(&self) {
        self.commands.lock().unwrap().clear();
    }

    fn record(&self, command: PlayerCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

#[async_trait]
impl PlayerPort for TestPlayer {
    async fn load(&self, path: &Path) -> Result<(), DomainError> {
        self.record(PlayerCommand::Load(path.to_path_buf()));
        self.position.send_replace(0.0);
        Ok(())
    }

    async fn unload(&self) {
        self.record(PlayerCommand::Unload);
        *self.playing.lock().unwrap() = false;
        self.position.send_replace(0.0);
    }

    async fn play(&self) -> Result<(), DomainError> {
        self.record(PlayerCommand::Play);
        *self.playing.lock().unwrap() = true;
        Ok(())
    }

    async fn pause(&self) -> Result<(), DomainError> {
        self.record(PlayerCommand::Pause);
        *self.playing.lock().unwrap() = false;
        Ok(())
    }

    async fn seek(&self, seconds: f64) -> Result<f64, DomainError> {
        self.record(PlayerCommand::Seek(seconds));
        self.position.send_replace(seconds);
        Ok(seconds)
    }

    fn positions(&self) -> watch::Receiver<f64> {
        self.position.subscribe()
    }

    async fn duration(&self) -> Option<f64> {
        None
    }

    async fn is_playing(&self) -> bool {
        *self.playing.lock().unwrap()
    }
}

struct StubExporter {
    outcome: Mutex<ExportOutcome>,
    delay: Mutex<Duration>,
    requests: Mutex<Vec<ExportRequest>>,
    cancels: AtomicUsize,
}

impl StubExporter {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(ExportOutcome::Completed {
                output: PathBuf::new(),
                duration_secs: Some(0.0),
            }),
            delay: Mutex::new(Duration::ZERO),
            requests: Mutex::new(Vec::new()),
            cancels: AtomicUsize::new(0),
        })
    }

    fn set_outcome(&self, outcome: ExportOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    fn requests(&self) -> Vec<ExportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExporterPort for StubExporter {
    async fn export(&self, request: &ExportRequest) -> Result<ExportOutcome, DomainError> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.outcome.lock().unwrap().clone();
        Ok(match outcome {
            // Completed echoes the requested output path
            ExportOutcome::Completed { duration_secs, .. } => ExportOutcome::Completed {
                output: request.output.clone(),
                duration_secs,
            },
            other => other,
        })
    }

    async fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

struct StubFs {
    destination: PathBuf,
}

#[async_trait]
impl FsPort for StubFs {
    async fn exists(&self, _path: &Path) -> Result<bool, DomainError> {
        // Sources live in scripted probes, not on disk
        Ok(true)
    }

    async fn copy_to_working(
        &self,
        source: &Path,
        _subfolder: &str,
    ) -> Result<PathBuf, DomainError> {
        // The "working copy" is the source itself; nothing touches disk
        Ok(source.to_path_buf())
    }

    async fn create_dir_all(&self, _path: &Path) -> Result<(), DomainError> {
        Ok(())
    }

    async fn remove_file(&self, _path: &Path) -> Result<(), DomainError> {
        Ok(())
    }

    async fn enumerate_dir(&self, path: &Path) -> Result<Vec<PathBuf>, DomainError> {
        let Ok(read) = std::fs::read_dir(path) else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<PathBuf> = read
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        entries.sort();
        Ok(entries)
    }

    async fn default_destination(&self) -> Result<PathBuf, DomainError> {
        Ok(self.destination.clone())
    }

    async fn reveal(&self, _path: &Path) -> Result<(), DomainError> {
        Ok(())
    }
}

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<SessionEvent>>,
}

impl EventSink for CollectingSink {
    fn on_event(&self, event: &SessionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// --- Harness ----------------------------------------------------------------

struct Harness {
    session: Arc<TrimSession>,
    scanner: Arc<StubScanner>,
    player: Arc<TestPlayer>,
    exporter: Arc<StubExporter>,
    sink: Arc<CollectingSink>,
    _destination: tempfile::TempDir,
}

impl Harness {
    fn new() -> Self {
        let destination = tempfile::tempdir().unwrap();
        let mut config = TrimConfig::default();
        config.destination_dir = Some(destination.path().to_path_buf());
        // Keep toggles from tripping over each other in fast tests
        config.toggle_debounce_ms = 50;

        let scanner = StubScanner::new();
        let player = TestPlayer::new();
        let exporter = StubExporter::new();
        let fs = Arc::new(StubFs {
            destination: destination.path().to_path_buf(),
        });
        let sink = Arc::new(CollectingSink::default());

        let session = TrimSession::new(
            config,
            scanner.clone(),
            player.clone(),
            exporter.clone(),
            fs,
        )
        .unwrap();
        session.add_sink(sink.clone());

        Self {
            session,
            scanner,
            player,
            exporter,
            sink,
            _destination: destination,
        }
    }

    async fn load_default_asset(&self) {
        self.scanner.register("/media/clip.mp4", 60.0);
        self.session
            .load_video(Path::new("/media/clip.mp4"))
            .await
            .unwrap();
    }

    fn events(&self) -> Vec<SessionEvent> {
        self.sink.events.lock().unwrap().clone()
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// --- Loading ----------------------------------------------------------------

#[tokio::test]
async fn test_load_resets_range_to_full_duration() {
    let h = Harness::new();
    h.load_default_asset().await;

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Ready);
    assert_eq!(snapshot.range.start, 0.0);
    assert_eq!(snapshot.range.end, 60.0);
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.output_file_name, "clip_trimmed.mp4");
    assert_eq!(snapshot.start_display(), "00:00.000");
    assert_eq!(snapshot.end_display(), "01:00.000");
    assert_eq!(snapshot.position_display(), "00:00.000");
    assert_eq!(snapshot.duration_display(), "01:00");
    assert!(snapshot.asset.unwrap().is_valid);
    assert!(h
        .player
        .commands()
        .contains(&PlayerCommand::Load(PathBuf::from("/media/clip.mp4"))));
}

#[tokio::test]
async fn test_load_rejects_unsupported_format() {
    let h = Harness::new();
    h.session
        .load_video(Path::new("/media/notes.txt"))
        .await
        .unwrap();

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert!(snapshot.asset.is_none());
    assert_eq!(
        snapshot.error_message.as_deref(),
        Some("Unsupported file format")
    );
}

#[tokio::test]
async fn test_load_surfaces_limit_violations() {
    let h = Harness::new();
    h.scanner.register("/media/marathon.mp4", 7300.0);
    h.session
        .load_video(Path::new("/media/marathon.mp4"))
        .await
        .unwrap();

    let snapshot = h.session.snapshot();
    assert!(snapshot.asset.is_none());
    assert_eq!(
        snapshot.error_message.as_deref(),
        Some("Duration exceeds the 120 minute limit")
    );
    assert!(h
        .events()
        .iter()
        .any(|event| matches!(event, SessionEvent::LoadFailed { .. })));
}

#[tokio::test]
async fn test_stale_load_result_is_discarded() {
    let h = Harness::new();
    h.scanner.register("/media/slow.mp4", 30.0);
    h.scanner.register("/media/fast.mp4", 60.0);

    h.scanner.set_delay(Duration::from_millis(150));
    let session = h.session.clone();
    let slow = tokio::spawn(async move {
        session.load_video(Path::new("/media/slow.mp4")).await
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    h.scanner.set_delay(Duration::ZERO);
    h.session
        .load_video(Path::new("/media/fast.mp4"))
        .await
        .unwrap();

    slow.await.unwrap().unwrap();

    let snapshot = h.session.snapshot();
    let asset = snapshot.asset.unwrap();
    assert_eq!(asset.path, PathBuf::from("/media/fast.mp4"));
    assert_eq!(asset.duration_secs, 60.0);
    assert_eq!(snapshot.range.end, 60.0);
}

// --- Range commands ---------------------------------------------------------

#[tokio::test]
async fn test_playhead_commands_follow_clamp_rules_end_to_end() {
    let h = Harness::new();
    h.load_default_asset().await;

    h.player.report(10.0);
    h.session.set_start_to_playhead().await.unwrap();

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Editing);
    assert_close(snapshot.range.start, 10.0);
    assert_close(snapshot.range.end, 60.0);

    // End set before the new start pulls the start back to keep the gap
    h.player.report(5.0);
    h.session.set_end_to_playhead().await.unwrap();

    let snapshot = h.session.snapshot();
    assert_close(snapshot.range.start, 4.9);
    assert_close(snapshot.range.end, 5.0);
}

#[tokio::test]
async fn test_range_commands_without_asset_are_noops() {
    let h = Harness::new();
    h.session.set_start_time(5.0).await.unwrap();
    h.session.set_end_time(10.0).await.unwrap();
    h.session.reset_trim().await.unwrap();

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.range.start, 0.0);
    assert_eq!(snapshot.range.end, 0.0);
    assert!(h.events().is_empty());
}

#[tokio::test]
async fn test_reset_trim_restores_full_range_and_rewinds() {
    let h = Harness::new();
    h.load_default_asset().await;

    h.session.set_start_time(10.0).await.unwrap();
    h.session.set_end_time(20.0).await.unwrap();
    h.player.clear_commands();

    h.session.reset_trim().await.unwrap();

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Ready);
    assert_eq!(snapshot.range.start, 0.0);
    assert_eq!(snapshot.range.end, 60.0);
    assert_eq!(h.player.commands(), vec![PlayerCommand::Seek(0.0)]);
}

#[tokio::test]
async fn test_range_changes_are_published() {
    let h = Harness::new();
    h.load_default_asset().await;

    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();

    let ranges: Vec<(f64, f64)> = h
        .events()
        .iter()
        .filter_map(|event| match event {
            SessionEvent::RangeChanged { start, end } => Some((*start, *end)),
            _ => None,
        })
        .collect();
    assert_eq!(ranges, vec![(2.0, 60.0), (2.0, 5.0)]);
}

// --- Playback ---------------------------------------------------------------

#[tokio::test]
async fn test_toggle_play_debounces_duplicate_triggers() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.player.clear_commands();

    h.session.toggle_play().await.unwrap();
    h.session.toggle_play().await.unwrap();

    assert_eq!(h.player.commands(), vec![PlayerCommand::Play]);

    tokio::time::sleep(Duration::from_millis(80)).await;
    h.session.toggle_play().await.unwrap();
    assert_eq!(
        h.player.commands(),
        vec![PlayerCommand::Play, PlayerCommand::Pause]
    );
}

#[tokio::test]
async fn test_skip_commands_move_the_playhead() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.player.report(10.0);
    h.player.clear_commands();

    h.session.skip_forward().await.unwrap();
    h.session.skip_backward().await.unwrap();

    let seeks: Vec<f64> = h
        .player
        .commands()
        .iter()
        .filter_map(|command| match command {
            PlayerCommand::Seek(seconds) => Some(*seconds),
            _ => None,
        })
        .collect();
    assert_eq!(seeks.len(), 2);
    assert!((seeks[0] - 10.333).abs() < 1e-9);
    assert!((seeks[1] - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_skip_backward_stops_at_zero() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.player.report(0.1);
    h.player.clear_commands();

    h.session.skip_backward().await.unwrap();
    assert_eq!(h.player.commands(), vec![PlayerCommand::Seek(0.0)]);
}

// --- Preview mode -----------------------------------------------------------

#[tokio::test]
async fn test_preview_entry_outside_range_rewinds_first() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();
    h.player.report(10.0);
    h.player.clear_commands();

    h.session.toggle_preview().await.unwrap();

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Previewing);
    assert!(snapshot.playback.is_preview_mode);
    assert!(snapshot.playback.is_playing);
    assert_eq!(
        h.player.commands(),
        vec![
            PlayerCommand::Pause,
            PlayerCommand::Seek(2.1),
            PlayerCommand::Play
        ]
    );
}

#[tokio::test]
async fn test_preview_entry_inside_range_just_starts_the_loop() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();
    h.player.report(3.0);
    h.player.clear_commands();

    h.session.toggle_preview().await.unwrap();

    assert_eq!(h.player.commands(), vec![PlayerCommand::Play]);
    assert_eq!(h.session.snapshot().phase, SessionPhase::Previewing);
}

#[tokio::test]
async fn test_preview_loop_rewinds_at_range_end() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();
    h.player.report(3.0);
    h.session.toggle_preview().await.unwrap();
    h.player.clear_commands();

    h.player.report(5.0);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let commands = h.player.commands();
    assert!(
        commands.contains(&PlayerCommand::Seek(2.1)) && commands.contains(&PlayerCommand::Play),
        "loop did not rewind: {:?}",
        commands
    );
}

#[tokio::test]
async fn test_preview_exit_leaves_playback_running_unlooped() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();
    h.player.report(3.0);
    h.session.toggle_preview().await.unwrap();

    h.session.toggle_preview().await.unwrap();
    h.player.clear_commands();

    // Past-the-end reports no longer trigger a rewind
    h.player.report(10.0);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(h.player.commands().is_empty());
    let snapshot = h.session.snapshot();
    assert!(!snapshot.playback.is_preview_mode);
    assert_eq!(snapshot.phase, SessionPhase::Editing);
}

#[tokio::test]
async fn test_range_change_while_previewing_rebuilds_the_loop() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();
    h.player.report(3.0);
    h.session.toggle_preview().await.unwrap();

    // Narrow the range past the playhead; the playhead is behind the new
    // start, so the session seeks forward to it
    h.player.report(3.0);
    h.session.set_start_time(4.0).await.unwrap();
    assert_eq!(h.session.snapshot().phase, SessionPhase::Previewing);
    h.player.clear_commands();

    // The rebuilt loop enforces the new start bound
    h.player.report(3.5);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let commands = h.player.commands();
    assert!(
        commands.contains(&PlayerCommand::Seek(4.1)),
        "rebuilt loop ignored new bounds: {:?}",
        commands
    );
}

#[tokio::test]
async fn test_seek_to_fraction_is_confined_while_previewing() {
    let h = Harness::new();
    h.load_default_asset().await;

    h.player.clear_commands();
    h.session.seek_to_fraction(0.5).await.unwrap();
    assert_eq!(h.player.commands(), vec![PlayerCommand::Seek(30.0)]);

    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();
    h.player.report(3.0);
    h.session.toggle_preview().await.unwrap();
    h.player.clear_commands();

    h.session.seek_to_fraction(0.0).await.unwrap();
    assert_eq!(h.player.commands(), vec![PlayerCommand::Seek(2.0)]);
}

#[tokio::test]
async fn test_seek_in_preview_snaps_outside_targets_to_range_start() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();
    h.player.report(3.0);
    h.session.toggle_preview().await.unwrap();
    h.player.clear_commands();

    h.session.seek_in_preview(50.0).await.unwrap();

    assert_eq!(
        h.player.commands(),
        vec![
            PlayerCommand::Pause,
            PlayerCommand::Seek(2.1),
            PlayerCommand::Play
        ]
    );
    assert!(h.session.snapshot().playback.is_playing);
}

// --- Export -----------------------------------------------------------------

#[tokio::test]
async fn test_export_delegates_validated_range_and_output() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.session.set_start_time(2.0).await.unwrap();
    h.session.set_end_time(5.0).await.unwrap();

    h.session.start_export().await.unwrap();

    let requests = h.exporter.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source, PathBuf::from("/media/clip.mp4"));
    assert_close(requests[0].range.start, 2.0);
    assert_close(requests[0].range.end, 5.0);
    assert_eq!(
        requests[0].output.file_name().unwrap().to_str().unwrap(),
        "clip_trimmed.mp4"
    );

    let snapshot = h.session.snapshot();
    assert!(!snapshot.is_processing);
    assert!(snapshot.error_message.is_none());
    assert!(h.events().iter().any(|event| matches!(
        event,
        SessionEvent::ExportFinished {
            outcome: ExportOutcome::Completed { .. }
        }
    )));
}

#[tokio::test]
async fn test_export_without_asset_is_a_noop() {
    let h = Harness::new();
    h.session.start_export().await.unwrap();

    assert!(h.exporter.requests().is_empty());
    assert!(h.events().is_empty());
}

#[tokio::test]
async fn test_second_export_rejected_while_one_is_running() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.exporter.set_delay(Duration::from_millis(150));

    let session = h.session.clone();
    let first = tokio::spawn(async move { session.start_export().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(h.session.snapshot().is_processing);
    assert!(!h.session.can_start_export());
    h.session.start_export().await.unwrap();

    first.await.unwrap().unwrap();
    assert_eq!(h.exporter.requests().len(), 1);
    assert!(!h.session.snapshot().is_processing);
}

#[tokio::test]
async fn test_cancelled_export_is_not_an_error() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.exporter.set_outcome(ExportOutcome::Cancelled);

    h.session.start_export().await.unwrap();

    let snapshot = h.session.snapshot();
    assert!(!snapshot.is_processing);
    assert!(snapshot.error_message.is_none());
    assert!(h.events().iter().any(|event| matches!(
        event,
        SessionEvent::ExportFinished {
            outcome: ExportOutcome::Cancelled
        }
    )));
}

#[tokio::test]
async fn test_failed_export_surfaces_reason_and_recovers() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.exporter.set_outcome(ExportOutcome::Failed {
        reason: "muxer exploded".to_string(),
    });

    h.session.start_export().await.unwrap();

    let snapshot = h.session.snapshot();
    assert!(!snapshot.is_processing);
    assert_eq!(snapshot.error_message.as_deref(), Some("muxer exploded"));
    // Fully recovered: the next attempt goes through
    assert!(h.session.can_start_export());
}

#[tokio::test]
async fn test_cancel_export_is_idempotent() {
    let h = Harness::new();

    h.session.cancel_export().await;
    h.session.cancel_export().await;

    assert_eq!(h.exporter.cancels.load(Ordering::SeqCst), 2);
    assert!(!h.session.snapshot().is_processing);
}

#[tokio::test]
async fn test_destination_entries_lists_only_media_files() {
    let h = Harness::new();
    let destination = h._destination.path();
    std::fs::write(destination.join("clip_trimmed.mp4"), b"").unwrap();
    std::fs::write(destination.join("older_trimmed.mov"), b"").unwrap();
    std::fs::write(destination.join("notes.txt"), b"").unwrap();

    let entries = h.session.destination_entries().await.unwrap();
    let names: Vec<_> = entries
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["clip_trimmed.mp4", "older_trimmed.mov"]);
}

// --- Reset ------------------------------------------------------------------

#[tokio::test]
async fn test_reset_state_returns_to_idle() {
    let h = Harness::new();
    h.load_default_asset().await;
    h.session.set_start_time(5.0).await.unwrap();

    h.session.reset_state().await;

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert!(snapshot.asset.is_none());
    assert_eq!(snapshot.range.start, 0.0);
    assert_eq!(snapshot.range.end, 0.0);
    assert!(snapshot.error_message.is_none());
    assert_eq!(snapshot.output_file_name, "");
    assert!(h.player.commands().contains(&PlayerCommand::Unload));
    assert!(h
        .events()
        .iter()
        .any(|event| matches!(event, SessionEvent::StateReset)));
}
