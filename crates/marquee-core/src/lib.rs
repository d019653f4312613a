//! `marquee-core` — shared foundation for the marquee kiosk.
//!
//! Holds what the engine and real front ends share: the TOML + env
//! configuration layer, the top-level error enum, and the collaborator
//! traits behind which the media backend and UI live ([`MediaPlayer`],
//! [`UiSurface`]). The engine never links against GStreamer or a widget
//! toolkit; it talks to these seams and nothing else.

pub mod config;
pub mod error;
pub mod player;
pub mod ui;

pub use config::MarqueeConfig;
pub use error::{MarqueeError, Result};
pub use player::{MediaPlayer, PlayerError, PlayerEvent};
pub use ui::UiSurface;
