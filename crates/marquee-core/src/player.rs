use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a media backend.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The backend refused or failed to start playback of the given file.
    #[error("Playback start failed: {0}")]
    StartFailed(String),

    /// The backend is not available (not initialised, crashed, …).
    #[error("Player unavailable: {0}")]
    Unavailable(String),
}

/// Completion events emitted by a media backend.
///
/// Backends run on their own tasks (or threads); events must be delivered
/// over an mpsc channel into the engine mailbox so all queue state is only
/// ever touched by the single engine actor.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// The current file played to the end.
    Finished,
    /// Playback aborted; the queue should advance exactly as for Finished.
    Failed { reason: String },
}

/// Common interface implemented by every media backend (GStreamer, mpv, a
/// logging stub, …).
///
/// Implementations must be `Send + Sync` so the engine can hold them behind
/// an `Arc` while backend tasks report completion concurrently.
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Stable lowercase identifier for this backend (e.g. `"gstreamer"`).
    fn name(&self) -> &str;

    /// Begin playback of `path`, replacing whatever is currently playing.
    ///
    /// Must return once playback has been handed to the backend; completion
    /// is reported later as a [`PlayerEvent`].
    async fn play_file(&self, path: &Path) -> Result<(), PlayerError>;

    /// Stop playback and release the output surface.
    async fn stop(&self) -> Result<(), PlayerError>;
}
