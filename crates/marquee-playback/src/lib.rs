//! `marquee-playback` — pending-clip bookkeeping for the kiosk.
//!
//! [`PlaybackQueue`] is the FIFO of clips waiting for the media backend,
//! gated by a single `playing` flag: the engine hands a clip straight to
//! the backend when idle and appends otherwise, advancing on completion
//! events. The queue holds paths only; it never talks to the backend
//! itself, so it stays synchronous and trivially testable.
//!
//! The `clips` module resolves the fixed clip layout on disk: hour-keyed
//! announcements with a fallback, and weekday greetings.

pub mod clips;
pub mod queue;

pub use clips::{hour_clip_path, resolve_hour_clip, weekday_greeting_path};
pub use queue::PlaybackQueue;
