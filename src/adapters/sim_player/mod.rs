//! Simulated player adapter
//!
//! A clock-driven stand-in for the platform media player: while "playing" it
//! advances a position watch channel on a fixed tick and pauses itself at the
//! media end. Media durations are registered up front since nothing is
//! actually decoded. Used by headless hosts and tests; GUI builds inject
//! their platform player instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::ports::PlayerPort;

#[derive(Default)]
struct SimInner {
    duration: Option<f64>,
    playing: bool,
}

/// Clock-driven player simulation
pub struct SimPlayerAdapter {
    tick: Duration,
    media: Mutex<HashMap<PathBuf, f64>>,
    inner: Arc<Mutex<SimInner>>,
    position: Arc<watch::Sender<f64>>,
    clock: Mutex<Option<JoinHandle<()>>>,
}

impl SimPlayerAdapter {
    /// Create a player reporting positions every `tick`
    pub fn new(tick: Duration) -> Self {
        let (position, _) = watch::channel(0.0);
        Self {
            tick,
            media: Mutex::new(HashMap::new()),
            inner: Arc::new(Mutex::new(SimInner::default())),
            position: Arc::new(position),
            clock: Mutex::new(None),
        }
    }

    /// Register a media path and the duration it should report
    pub fn register_media(&self, path: impl Into<PathBuf>, duration_secs: f64) {
        self.media.lock().unwrap().insert(path.into(), duration_secs);
    }

    fn stop_clock(&self) {
        if let Some(handle) = self.clock.lock().unwrap().take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl PlayerPort for SimPlayerAdapter {
    async fn load(&self, path: &Path) -> Result<(), DomainError> {
        let duration = self
            .media
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| {
                DomainError::PlaybackFail(format!("No registered media at {}", path.display()))
            })?;

        self.stop_clock();
        {
            let mut inner = self.inner.lock().unwrap();
            inner.duration = Some(duration);
            inner.playing = false;
        }
        self.position.send_replace(0.0);
        debug!("sim player loaded {} ({:.3}s)", path.display(), duration);
        Ok(())
    }

    async fn unload(&self) {
        self.stop_clock();
        {
            let mut inner = self.inner.lock().unwrap();
            inner.duration = None;
            inner.playing = false;
        }
        self.position.send_replace(0.0);
    }

    async fn play(&self) -> Result<(), DomainError> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.duration.is_none() {
                return Err(DomainError::PlaybackFail("No media loaded".to_string()));
            }
            if inner.playing {
                return Ok(());
            }
            inner.playing = true;
        }

        self.stop_clock();
        let inner = Arc::clone(&self.inner);
        let position = Arc::clone(&self.position);
        let tick = self.tick;
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(tick).await;
                let mut state = inner.lock().unwrap();
                if !state.playing {
                    break;
                }
                let Some(duration) = state.duration else {
                    break;
                };
                let next = (*position.borrow() + tick.as_secs_f64()).min(duration);
                position.send_replace(next);
                if next >= duration {
                    // A real player pauses itself at the media end
                    state.playing = false;
                    break;
                }
            }
        });
        *self.clock.lock().unwrap() = Some(handle);
        Ok(())
    }

    async fn pause(&self) -> Result<(), DomainError> {
        self.inner.lock().unwrap().playing = false;
        self.stop_clock();
        Ok(())
    }

    async fn seek(&self, seconds: f64) -> Result<f64, DomainError> {
        let duration = self
            .inner
            .lock()
            .unwrap()
            .duration
            .ok_or_else(|| DomainError::PlaybackFail("No media loaded".to_string()))?;

        let landed = seconds.clamp(0.0, duration);
        self.position.send_replace(landed);
        Ok(landed)
    }

    fn positions(&self) -> watch::Receiver<f64> {
        self.position.subscribe()
    }

    async fn duration(&self) -> Option<f64> {
        self.inner.lock().unwrap().duration
    }

    async fn is_playing(&self) -> bool {
        self.inner.lock().unwrap().playing
    }
}
