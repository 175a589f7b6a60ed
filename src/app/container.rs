use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{FfmpegExportAdapter, FfprobeScanAdapter, FsStdAdapter, SimPlayerAdapter};
use crate::app::session::TrimSession;
use crate::config::TrimConfig;
use crate::domain::errors::DomainError;
use crate::ports::{ExporterPort, FsPort, PlayerPort, ScannerPort};

/// Position report interval for the default simulated player (~30 Hz)
const DEFAULT_PLAYER_TICK: Duration = Duration::from_millis(33);

/// Wires a [`TrimSession`] to the production adapters.
///
/// Scanning and export run through the ffprobe/ffmpeg executables; the
/// filesystem adapter uses the local disk. Playback defaults to the clock
/// simulation; a GUI host replaces it with its platform player through
/// [`DefaultAppContainer::with_player`].
pub struct DefaultAppContainer {
    session: Arc<TrimSession>,
}

impl DefaultAppContainer {
    pub fn new(config: TrimConfig) -> Result<Self, DomainError> {
        let player = Arc::new(SimPlayerAdapter::new(DEFAULT_PLAYER_TICK));
        Self::with_player(config, player)
    }

    pub fn with_player(
        config: TrimConfig,
        player: Arc<dyn PlayerPort>,
    ) -> Result<Self, DomainError> {
        let scanner: Arc<dyn ScannerPort> = Arc::new(FfprobeScanAdapter::new());
        let fs: Arc<dyn FsPort> = Arc::new(FsStdAdapter::new()?);
        let exporter: Arc<dyn ExporterPort> =
            Arc::new(FfmpegExportAdapter::new(Arc::clone(&scanner)));

        let session = TrimSession::new(config, scanner, player, exporter, fs)?;

        Ok(Self { session })
    }

    pub fn session(&self) -> Arc<TrimSession> {
        Arc::clone(&self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SessionPhase;

    #[tokio::test]
    async fn test_container_wires_an_idle_session() {
        let container = DefaultAppContainer::new(TrimConfig::default()).unwrap();
        let session = container.session();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert!(snapshot.asset.is_none());
        assert!(!session.can_start_export());
    }

    #[test]
    fn test_container_rejects_invalid_config() {
        let mut config = TrimConfig::default();
        config.min_trim_duration = 0.0;
        assert!(DefaultAppContainer::new(config).is_err());
    }
}
