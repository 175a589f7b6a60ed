// Trim session - State owner and command surface for the trimming workflow

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::events::{EventSink, SessionEvent};
use crate::config::TrimConfig;
use crate::domain::errors::DomainError;
use crate::domain::model::{
    ExportOutcome, ExportRequest, PlaybackState, SessionPhase, TrimRange, VideoAsset,
};
use crate::domain::rules::TrimValidator;
use crate::engine::{ExportOrchestrator, PreviewLoop};
use crate::error::TrimResult;
use crate::output::NamingResolver;
use crate::ports::{ExporterPort, FsPort, PlayerPort, ScannerPort};
use crate::utils::time::{format_clock, format_clock_millis};

/// Mutable session state, guarded by the session mutex
#[derive(Default)]
struct SessionState {
    asset: Option<VideoAsset>,
    local_path: Option<PathBuf>,
    range: TrimRange,
    playback: PlaybackState,
    phase: SessionPhase,
    is_loading: bool,
    is_processing: bool,
    error_message: Option<String>,
    output_file_name: String,
    preview_loop: Option<PreviewLoop>,
    position_feed: Option<JoinHandle<()>>,
}

impl SessionState {
    fn range_is_full(&self) -> bool {
        match &self.asset {
            Some(asset) => self.range == TrimRange::full(asset.duration_secs),
            None => true,
        }
    }

    fn teardown_tasks(&mut self) {
        self.preview_loop = None;
        if let Some(feed) = self.position_feed.take() {
            feed.abort();
        }
    }
}

/// Cloned view of the session state for rendering layers
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub asset: Option<VideoAsset>,
    pub range: TrimRange,
    pub playback: PlaybackState,
    pub is_loading: bool,
    pub is_processing: bool,
    pub error_message: Option<String>,
    pub output_file_name: String,
}

impl SessionSnapshot {
    /// Range start formatted with milliseconds
    pub fn start_display(&self) -> String {
        format_clock_millis(self.range.start)
    }

    /// Range end formatted with milliseconds
    pub fn end_display(&self) -> String {
        format_clock_millis(self.range.end)
    }

    /// Playhead formatted with milliseconds
    pub fn position_display(&self) -> String {
        format_clock_millis(self.playback.current_time)
    }

    /// Asset duration formatted without milliseconds
    pub fn duration_display(&self) -> String {
        self.asset
            .as_ref()
            .map(|asset| format_clock(asset.duration_secs))
            .unwrap_or_else(|| "00:00".to_string())
    }
}

/// Owner of the trim workflow state.
///
/// All mutating commands are expected to arrive serialized from a single UI
/// thread; the internal mutex protects the state from the session's own
/// background tasks (position feed, preview loop), never from concurrent
/// command writers. Commands never hold the state lock across an await.
pub struct TrimSession {
    config: TrimConfig,
    scanner: Arc<dyn ScannerPort>,
    player: Arc<dyn PlayerPort>,
    fs: Arc<dyn FsPort>,
    export: ExportOrchestrator,
    naming: NamingResolver,
    state: Mutex<SessionState>,
    sinks: Mutex<Vec<Arc<dyn EventSink>>>,
    load_generation: AtomicU64,
    last_toggle: Mutex<Option<Instant>>,
}

impl TrimSession {
    /// Create a session wired to its collaborators
    pub fn new(
        config: TrimConfig,
        scanner: Arc<dyn ScannerPort>,
        player: Arc<dyn PlayerPort>,
        exporter: Arc<dyn ExporterPort>,
        fs: Arc<dyn FsPort>,
    ) -> Result<Arc<Self>, DomainError> {
        config.validate()?;
        let naming = NamingResolver::new(config.naming_max_attempts);

        Ok(Arc::new(Self {
            export: ExportOrchestrator::new(exporter, naming),
            config,
            scanner,
            player,
            fs,
            naming,
            state: Mutex::new(SessionState::default()),
            sinks: Mutex::new(Vec::new()),
            load_generation: AtomicU64::new(0),
            last_toggle: Mutex::new(None),
        }))
    }

    /// Register an event sink
    pub fn add_sink(&self, sink: Arc<dyn EventSink>) {
        self.sinks.lock().unwrap().push(sink);
    }

    /// Cloned view of the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().unwrap();
        SessionSnapshot {
            phase: state.phase,
            asset: state.asset.clone(),
            range: state.range,
            playback: state.playback,
            is_loading: state.is_loading,
            is_processing: state.is_processing,
            error_message: state.error_message.clone(),
            output_file_name: state.output_file_name.clone(),
        }
    }

    /// Whether an export could start right now
    pub fn can_start_export(&self) -> bool {
        let state = self.state.lock().unwrap();
        match &state.asset {
            Some(asset) => {
                !state.is_processing
                    && TrimValidator::validate_settings(
                        &state.range,
                        asset,
                        self.config.min_trim_duration,
                    )
                    .is_valid()
            }
            None => false,
        }
    }

    // --- File loading -----------------------------------------------------

    /// Load a source file, superseding any in-flight load.
    ///
    /// Each load is tagged with a generation; a load's result is applied only
    /// while its generation is still the latest, so a stale scan can never
    /// overwrite the state of a newer one.
    pub async fn load_video(self: &Arc<Self>, path: &Path) -> TrimResult<()> {
        let generation = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("loading video {} (generation {})", path.display(), generation);

        {
            let mut state = self.state.lock().unwrap();
            state.is_loading = true;
            state.error_message = None;
        }

        if !self.config.is_supported_format(path) {
            self.fail_load(generation, "Unsupported file format".to_string());
            return Ok(());
        }

        let result = self.copy_and_scan(path).await;

        if self.load_generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale load result for {}", path.display());
            return Ok(());
        }

        match result {
            Ok((local, asset)) if asset.is_valid => {
                self.apply_loaded_asset(local, asset).await;
            }
            Ok((_, asset)) => {
                let message = asset
                    .invalid_reason
                    .unwrap_or_else(|| "Invalid video file".to_string());
                self.fail_load(generation, message);
            }
            Err(e) => {
                self.fail_load(generation, e.to_string());
            }
        }
        Ok(())
    }

    async fn copy_and_scan(&self, path: &Path) -> Result<(PathBuf, VideoAsset), DomainError> {
        if !self.fs.exists(path).await? {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }
        let local = self
            .fs
            .copy_to_working(path, &self.config.working_subdir)
            .await?;
        let probe = self.scanner.scan(&local).await?;
        let asset = VideoAsset::from_probe(local.clone(), probe, &self.config.asset_limits());
        Ok((local, asset))
    }

    async fn apply_loaded_asset(self: &Arc<Self>, local: PathBuf, asset: VideoAsset) {
        let duration = asset.duration_secs;
        let parent = local
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let display_name = match self.naming.resolve(&local, &parent, None) {
            Ok(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Err(_) => self.naming.timestamped_name(&local, None),
        };

        {
            let mut state = self.state.lock().unwrap();
            state.teardown_tasks();
            state.asset = Some(asset.clone());
            state.local_path = Some(local.clone());
            state.range.set_full(duration);
            state.playback = PlaybackState::default();
            state.phase = SessionPhase::Ready;
            state.output_file_name = display_name;
            state.error_message = None;
        }

        if let Err(e) = self.player.load(&local).await {
            warn!("player failed to load {}: {}", local.display(), e);
            self.state.lock().unwrap().error_message = Some(e.to_string());
        }

        {
            let mut state = self.state.lock().unwrap();
            state.position_feed = Some(self.spawn_position_feed());
            state.is_loading = false;
        }

        self.emit(SessionEvent::AssetLoaded {
            path: asset.path,
            duration_secs: duration,
        });
    }

    fn fail_load(&self, generation: u64, message: String) {
        if self.load_generation.load(Ordering::SeqCst) != generation {
            return;
        }
        {
            let mut state = self.state.lock().unwrap();
            state.is_loading = false;
            state.error_message = Some(message.clone());
        }
        self.emit(SessionEvent::LoadFailed { message });
    }

    // --- Playback ---------------------------------------------------------

    /// Toggle play/pause.
    ///
    /// Calls arriving within the debounce window are dropped: the toggle is
    /// reachable from a button, a menu command and a keyboard shortcut, and
    /// overlapping input sources fire it twice for one user action.
    pub async fn toggle_play(&self) -> TrimResult<()> {
        {
            let mut last = self.last_toggle.lock().unwrap();
            let now = Instant::now();
            if let Some(previous) = *last {
                if now.duration_since(previous)
                    < Duration::from_millis(self.config.toggle_debounce_ms)
                {
                    debug!("toggle_play dropped (debounce)");
                    return Ok(());
                }
            }
            *last = Some(now);
        }

        if self.state.lock().unwrap().asset.is_none() {
            return Ok(());
        }

        if self.player.is_playing().await {
            self.player.pause().await?;
        } else {
            self.player.play().await?;
        }
        let is_playing = self.player.is_playing().await;

        let preview = {
            let mut state = self.state.lock().unwrap();
            state.playback.is_playing = is_playing;
            state.playback.is_preview_mode
        };
        self.emit(SessionEvent::PlaybackChanged { is_playing });

        if is_playing && preview {
            self.rebuild_preview_loop();
        }
        Ok(())
    }

    /// Seek to an absolute position
    pub async fn seek(&self, time: f64) -> TrimResult<()> {
        let landed = self.player.seek(time).await?;
        self.state.lock().unwrap().playback.current_time = landed;
        Ok(())
    }

    /// Skip forward by the configured step
    pub async fn skip_forward(&self) -> TrimResult<()> {
        let target = self.playhead() + self.config.skip_duration;
        self.seek(target).await
    }

    /// Skip backward by the configured step
    pub async fn skip_backward(&self) -> TrimResult<()> {
        let target = self.playhead() - self.config.skip_duration;
        self.seek(target.max(0.0)).await
    }

    /// Seek to a fraction of the asset duration (timeline scrubbing).
    ///
    /// In preview mode the fraction is confined to the trim range first.
    pub async fn seek_to_fraction(&self, fraction: f64) -> TrimResult<()> {
        let (duration, bounds) = {
            let state = self.state.lock().unwrap();
            let Some(asset) = state.asset.as_ref() else {
                return Ok(());
            };
            let bounds = state
                .playback
                .is_preview_mode
                .then(|| (state.range.start, state.range.end));
            (asset.duration_secs, bounds)
        };

        let mut time = fraction.clamp(0.0, 1.0) * duration;
        if let Some((start, end)) = bounds {
            time = time.clamp(start, end);
        }
        self.seek(time).await
    }

    // --- Trim range -------------------------------------------------------

    /// Move the range start to a specific time
    pub async fn set_start_time(&self, time: f64) -> TrimResult<()> {
        let Some((range, preview)) = self.mutate_range(|range, duration, min_gap| {
            range.set_start(time, duration, min_gap);
        }) else {
            return Ok(());
        };

        if preview {
            if self.playhead() < range.start {
                self.seek(range.start).await?;
            }
            self.rebuild_preview_loop();
        }
        Ok(())
    }

    /// Move the range end to a specific time
    pub async fn set_end_time(&self, time: f64) -> TrimResult<()> {
        let Some((range, preview)) = self.mutate_range(|range, duration, min_gap| {
            range.set_end(time, duration, min_gap);
        }) else {
            return Ok(());
        };

        if preview {
            if self.playhead() > range.end {
                self.seek(range.start).await?;
            }
            self.rebuild_preview_loop();
        }
        Ok(())
    }

    /// Move the range start to the current playhead
    pub async fn set_start_to_playhead(&self) -> TrimResult<()> {
        self.set_start_time(self.playhead()).await
    }

    /// Move the range end to the current playhead
    pub async fn set_end_to_playhead(&self) -> TrimResult<()> {
        self.set_end_time(self.playhead()).await
    }

    /// Reset the range to the full asset duration and rewind
    pub async fn reset_trim(&self) -> TrimResult<()> {
        let range = {
            let mut state = self.state.lock().unwrap();
            let Some(duration) = state.asset.as_ref().map(|a| a.duration_secs) else {
                return Ok(());
            };
            state.range.set_full(duration);
            if state.phase != SessionPhase::Previewing {
                state.phase = SessionPhase::Ready;
            }
            state.range
        };

        self.emit(SessionEvent::RangeChanged {
            start: range.start,
            end: range.end,
        });
        self.seek(0.0).await?;
        if self.state.lock().unwrap().playback.is_preview_mode {
            self.rebuild_preview_loop();
        }
        Ok(())
    }

    /// Apply a clamped range mutation; returns the new range and whether
    /// preview mode is active. `None` when no asset is loaded.
    fn mutate_range<F>(&self, mutate: F) -> Option<(TrimRange, bool)>
    where
        F: FnOnce(&mut TrimRange, f64, f64),
    {
        let (range, preview) = {
            let mut state = self.state.lock().unwrap();
            let duration = state.asset.as_ref().map(|a| a.duration_secs)?;
            mutate(&mut state.range, duration, self.config.min_trim_duration);
            if state.phase != SessionPhase::Previewing {
                state.phase = SessionPhase::Editing;
            }
            (state.range, state.playback.is_preview_mode)
        };

        self.emit(SessionEvent::RangeChanged {
            start: range.start,
            end: range.end,
        });
        Some((range, preview))
    }

    // --- Preview mode -----------------------------------------------------

    /// Toggle preview mode.
    ///
    /// Entering preview with the playhead outside the range pauses playback,
    /// seeks to `start + rewind_buffer`, and only then installs the loop and
    /// resumes, so playback never jumps mid-frame. Exiting preview tears the
    /// loop down and leaves playback running unlooped.
    pub async fn toggle_preview(&self) -> TrimResult<()> {
        let (enabled, range, was_playing) = {
            let mut state = self.state.lock().unwrap();
            if state.asset.is_none() {
                return Ok(());
            }
            state.playback.is_preview_mode = !state.playback.is_preview_mode;
            (
                state.playback.is_preview_mode,
                state.range,
                state.playback.is_playing,
            )
        };
        let playhead = self.playhead();
        self.emit(SessionEvent::PreviewModeChanged { enabled });

        if enabled {
            if !range.contains(playhead) {
                self.player.pause().await?;
                let landed = self.player.seek(range.start + self.config.rewind_buffer).await?;
                self.rebuild_preview_loop();
                self.player.play().await?;
                let mut state = self.state.lock().unwrap();
                state.playback.current_time = landed;
                state.playback.is_playing = true;
                state.phase = SessionPhase::Previewing;
            } else {
                self.rebuild_preview_loop();
                if !was_playing {
                    self.player.play().await?;
                }
                let mut state = self.state.lock().unwrap();
                state.playback.is_playing = true;
                state.phase = SessionPhase::Previewing;
            }
        } else {
            let mut state = self.state.lock().unwrap();
            state.preview_loop = None;
            state.phase = if state.range_is_full() {
                SessionPhase::Ready
            } else {
                SessionPhase::Editing
            };
        }
        Ok(())
    }

    /// Seek while previewing: positions outside the range snap to
    /// `start + rewind_buffer`, then playback resumes and the loop is rebuilt
    pub async fn seek_in_preview(&self, time: f64) -> TrimResult<()> {
        let range = {
            let state = self.state.lock().unwrap();
            if state.asset.is_none() {
                return Ok(());
            }
            state.range
        };

        self.player.pause().await?;
        let target = if range.contains(time) {
            time
        } else {
            range.start + self.config.rewind_buffer
        };
        let landed = self.player.seek(target).await?;
        self.player.play().await?;
        {
            let mut state = self.state.lock().unwrap();
            state.playback.current_time = landed;
            state.playback.is_playing = true;
        }
        self.rebuild_preview_loop();
        Ok(())
    }

    fn rebuild_preview_loop(&self) {
        let mut state = self.state.lock().unwrap();
        state.preview_loop = Some(PreviewLoop::spawn(
            Arc::clone(&self.player),
            state.range.start,
            state.range.end,
            self.config.rewind_buffer,
        ));
    }

    // --- Export -----------------------------------------------------------

    /// Start an export of the current range.
    ///
    /// A no-op without state change when no asset is loaded, the range is
    /// invalid, or another export is already in flight.
    pub async fn start_export(&self) -> TrimResult<()> {
        let (local, range) = {
            let mut state = self.state.lock().unwrap();
            let Some(asset) = state.asset.clone() else {
                return Ok(());
            };
            if state.is_processing || self.export.is_active() {
                debug!("export rejected: already in progress");
                return Ok(());
            }
            if !TrimValidator::validate_settings(
                &state.range,
                &asset,
                self.config.min_trim_duration,
            )
            .is_valid()
            {
                debug!("export rejected: invalid trim settings");
                return Ok(());
            }
            let Some(local) = state.local_path.clone() else {
                state.error_message = Some("Working copy of the video is missing".to_string());
                return Ok(());
            };
            state.is_processing = true;
            (local, state.range)
        };

        let result = self.run_export(&local, range).await;

        {
            let mut state = self.state.lock().unwrap();
            state.is_processing = false;
            match &result {
                Ok(ExportOutcome::Failed { reason }) => {
                    state.error_message = Some(reason.clone());
                }
                Err(e) => state.error_message = Some(e.to_string()),
                _ => {}
            }
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => ExportOutcome::Failed {
                reason: e.to_string(),
            },
        };
        if let ExportOutcome::Completed { output, .. } = &outcome {
            if let Err(e) = self.fs.reveal(output).await {
                debug!("reveal failed: {}", e);
            }
        }
        self.emit(SessionEvent::ExportFinished { outcome });
        Ok(())
    }

    async fn run_export(
        &self,
        local: &Path,
        range: TrimRange,
    ) -> Result<ExportOutcome, DomainError> {
        let destination = match &self.config.destination_dir {
            Some(dir) => dir.clone(),
            None => self.fs.default_destination().await?,
        };
        self.fs.create_dir_all(&destination).await?;

        let output = self.export.resolve_output(local, &destination)?;
        {
            let mut state = self.state.lock().unwrap();
            state.output_file_name = output
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        self.emit(SessionEvent::ExportStarted {
            output: output.clone(),
        });

        let request = ExportRequest {
            source: local.to_path_buf(),
            range,
            output,
        };
        self.export.export(&request).await
    }

    /// Request cancellation of the in-flight export.
    ///
    /// Safe to call when idle and safe to call repeatedly.
    pub async fn cancel_export(&self) {
        self.export.cancel().await;
        self.state.lock().unwrap().is_processing = false;
    }

    /// Media files currently present in the export destination folder
    pub async fn destination_entries(&self) -> TrimResult<Vec<PathBuf>> {
        let destination = match &self.config.destination_dir {
            Some(dir) => dir.clone(),
            None => self.fs.default_destination().await?,
        };
        let entries = self.fs.enumerate_dir(&destination).await?;
        Ok(entries
            .into_iter()
            .filter(|path| self.config.is_supported_format(path))
            .collect())
    }

    // --- Reset ------------------------------------------------------------

    /// Drop the current asset and return to the idle state.
    ///
    /// Supersedes any in-flight load, cancels a running export, tears down
    /// the preview loop and position feed, and deletes the working copy.
    pub async fn reset_state(&self) {
        self.load_generation.fetch_add(1, Ordering::SeqCst);
        self.export.cancel().await;

        let local = {
            let mut state = self.state.lock().unwrap();
            state.teardown_tasks();
            let local = state.local_path.take();
            *state = SessionState::default();
            local
        };
        self.player.unload().await;
        if let Some(local) = local {
            if let Err(e) = self.fs.remove_file(&local).await {
                debug!("failed to remove working copy: {}", e);
            }
        }
        self.emit(SessionEvent::StateReset);
    }

    // --- Internals --------------------------------------------------------

    /// Latest reported playhead position
    fn playhead(&self) -> f64 {
        *self.player.positions().borrow()
    }

    fn emit(&self, event: SessionEvent) {
        let sinks = self.sinks.lock().unwrap();
        for sink in sinks.iter() {
            sink.on_event(&event);
        }
    }

    /// Forward player position reports into the session state.
    ///
    /// Event emission is throttled; the state itself always carries the
    /// latest report. Playback-state flips (e.g. the player pausing itself at
    /// the media end) are mirrored on the same feed.
    fn spawn_position_feed(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let mut positions = session.player.positions();
            let min_interval = Duration::from_millis(session.config.position_event_interval_ms);
            let mut last_emit: Option<Instant> = None;

            while positions.changed().await.is_ok() {
                let seconds = *positions.borrow_and_update();
                let is_playing = session.player.is_playing().await;

                let playback_flipped = {
                    let mut state = session.state.lock().unwrap();
                    state.playback.current_time = seconds;
                    if state.playback.is_playing != is_playing {
                        state.playback.is_playing = is_playing;
                        true
                    } else {
                        false
                    }
                };

                if playback_flipped {
                    session.emit(SessionEvent::PlaybackChanged { is_playing });
                }
                let due = last_emit
                    .map(|at| at.elapsed() >= min_interval)
                    .unwrap_or(true);
                if due {
                    last_emit = Some(Instant::now());
                    session.emit(SessionEvent::PositionChanged { seconds });
                }
            }
        })
    }
}
