/// Display surface the engine drives: clock text, toasts, and the video
/// layer toggle.
///
/// Calls must be cheap and non-blocking; they run on the engine actor's
/// task, once per tick for the clock. A real front end should forward them
/// to its own event loop.
pub trait UiSurface: Send + Sync {
    /// Replace the on-screen clock text (called once per tick).
    fn set_clock_text(&self, text: &str);

    /// Show `message` for `secs` seconds. A new toast replaces the old one.
    fn show_toast(&self, message: &str, secs: u32);

    /// Raise the video surface above the idle clock display.
    fn show_video_layer(&self);

    /// Drop back to the idle clock display.
    fn hide_video_layer(&self);
}
