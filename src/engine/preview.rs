//! Preview loop controller
//!
//! While preview mode is active, playback must stay confined to the trim
//! range. The loop watches the player's position reports and rewinds to
//! `start + rewind_buffer` whenever a report lands at or past the end, or
//! before the start. The buffer keeps a seek that lands exactly on the
//! boundary from re-triggering the check.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::ports::PlayerPort;

/// Active preview loop bound to a fixed range.
///
/// Bounds are captured at spawn time. When the range changes, drop the old
/// loop and spawn a new one; dropping aborts the watcher task and discards its
/// position subscription, so a stale loop can never act on outdated bounds.
pub struct PreviewLoop {
    handle: JoinHandle<()>,
}

impl PreviewLoop {
    /// Spawn a loop watching position reports against `[start, end]`
    pub fn spawn(player: Arc<dyn PlayerPort>, start: f64, end: f64, rewind_buffer: f64) -> Self {
        let handle = tokio::spawn(async move {
            let mut positions = player.positions();

            while positions.changed().await.is_ok() {
                let position = *positions.borrow_and_update();
                if position >= end || position < start {
                    debug!(
                        "preview loop rewind: position {:.3} outside [{:.3}, {:.3}]",
                        position, start, end
                    );
                    if player.seek(start + rewind_buffer).await.is_err() {
                        break;
                    }
                    if player.play().await.is_err() {
                        break;
                    }
                }
            }
        });

        Self { handle }
    }
}

impl Drop for PreviewLoop {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
