use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

// Engine cadence constants; shared by the tick loop and its tests
pub const TICK_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_TOAST_SECS: u32 = 4; // toast visible duration
pub const DEFAULT_DEBOUNCE_MS: u64 = 1_000; // manual-trigger suppression window
pub const UPCOMING_LOG_EVERY_TICKS: u32 = 60; // next-event log cadence

/// Top-level config (marquee.toml + MARQUEE_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarqueeConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            media: MediaConfig::default(),
            ui: UiConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

/// Locations of the two data files the engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// `;`-separated schedule rows (one header line, then one row per entry).
    #[serde(default = "default_schedule_path")]
    pub path: String,
    /// JSON action table: name -> ordered list of single-key step records.
    #[serde(default = "default_script_path")]
    pub script_path: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            path: default_schedule_path(),
            script_path: default_script_path(),
        }
    }
}

/// Where clips live and which ones anchor the fixed behaviors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory holding hour announcements and weekday greetings.
    #[serde(default = "default_announcements_dir")]
    pub announcements_dir: String,
    /// Filename prefix shared by the clips in `announcements_dir`
    /// (e.g. `"c10 - "` for `c10 - 09h.mp4`). Empty by default.
    #[serde(default)]
    pub clip_prefix: String,
    /// Played when an hour announcement is missing.
    #[serde(default = "default_fallback_clip")]
    pub fallback_clip: String,
    /// Enqueued once at startup, before the weekday greeting.
    #[serde(default = "default_intro_clip")]
    pub intro_clip: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            announcements_dir: default_announcements_dir(),
            clip_prefix: String::new(),
            fallback_clip: default_fallback_clip(),
            intro_clip: default_intro_clip(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Seconds a toast stays visible.
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: default_toast_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Manual-trigger suppression window, per action name.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Action fired by the external manual trigger (SIGUSR1).
    #[serde(default = "default_manual_action")]
    pub manual_action: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            manual_action: default_manual_action(),
        }
    }
}

fn default_schedule_path() -> String {
    "schedule.csv".to_string()
}
fn default_script_path() -> String {
    "script.json".to_string()
}
fn default_announcements_dir() -> String {
    "media/announcements".to_string()
}
fn default_fallback_clip() -> String {
    "media/idle.mp4".to_string()
}
fn default_intro_clip() -> String {
    "media/hello.mp4".to_string()
}
fn default_toast_secs() -> u32 {
    DEFAULT_TOAST_SECS
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_manual_action() -> String {
    "ACT_MANUAL".to_string()
}

impl MarqueeConfig {
    /// Load config from a TOML file with MARQUEE_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./marquee.toml (the kiosk runs from its install directory)
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("marquee.toml");

        let config: MarqueeConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("MARQUEE_").split("_"))
            .extract()
            .map_err(|e| crate::error::MarqueeError::Config(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = MarqueeConfig::default();
        assert_eq!(cfg.ui.toast_secs, DEFAULT_TOAST_SECS);
        assert_eq!(cfg.engine.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(cfg.schedule.path, "schedule.csv");
        assert!(cfg.media.clip_prefix.is_empty());
    }

    #[test]
    fn missing_file_yields_defaults() {
        // Figment treats a missing TOML file as an empty source.
        let cfg = MarqueeConfig::load(Some("/nonexistent/marquee.toml")).expect("load failed");
        assert_eq!(cfg.schedule.script_path, "script.json");
    }
}
