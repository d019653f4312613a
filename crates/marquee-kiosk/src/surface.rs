use std::path::Path;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

use marquee_core::{MediaPlayer, PlayerError, PlayerEvent, UiSurface};

/// Log-only stand-in for the real video backend.
///
/// Reports every clip as finished straight away so the queue keeps
/// draining; a real kiosk swaps in a GStreamer-backed implementation that
/// sends [`PlayerEvent`]s from its bus watcher instead.
pub struct LoggingPlayer {
    events: mpsc::Sender<PlayerEvent>,
}

impl LoggingPlayer {
    pub fn new(events: mpsc::Sender<PlayerEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl MediaPlayer for LoggingPlayer {
    fn name(&self) -> &str {
        "logging"
    }

    async fn play_file(&self, path: &Path) -> Result<(), PlayerError> {
        info!(path = %path.display(), "play");
        let events = self.events.clone();
        // Completion must arrive through the engine mailbox, not inside
        // this call; same contract a real backend honours from its own
        // event thread.
        tokio::spawn(async move {
            let _ = events.send(PlayerEvent::Finished).await;
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), PlayerError> {
        info!("stop");
        Ok(())
    }
}

/// Log-only display surface. Clock updates land at debug so the default
/// filter doesn't emit one line per second.
pub struct LogUi;

impl UiSurface for LogUi {
    fn set_clock_text(&self, text: &str) {
        debug!(%text, "clock");
    }

    fn show_toast(&self, message: &str, secs: u32) {
        info!(%message, secs, "toast");
    }

    fn show_video_layer(&self) {
        debug!("video layer shown");
    }

    fn hide_video_layer(&self) {
        debug!("video layer hidden");
    }
}
