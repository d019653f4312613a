use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// Suppresses rapid repeated manual triggers of the same action name.
///
/// Keyed by action name and tracked independently of the scheduler's daily
/// fired flags; scheduled firings never pass through here. The caller
/// supplies `now` so tests control time.
#[derive(Debug)]
pub struct TriggerDebounce {
    window: Duration,
    last: HashMap<String, Instant>,
}

impl TriggerDebounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: HashMap::new(),
        }
    }

    /// True when the trigger may run, recording `now` as the latest trigger.
    /// A repeat inside the window returns false and does not extend it.
    pub fn allow(&mut self, name: &str, now: Instant) -> bool {
        if let Some(&prev) = self.last.get(name) {
            if now.duration_since(prev) < self.window {
                return false;
            }
        }
        self.last.insert(name.to_string(), now);
        true
    }
}
