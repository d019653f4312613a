use std::path::{Path, PathBuf};

use chrono::Weekday;

/// Path of the announcement clip for a wall-clock hour:
/// `<dir>/<prefix><HH>h.mp4`.
pub fn hour_clip_path(dir: &Path, prefix: &str, hour: u32) -> PathBuf {
    dir.join(format!("{prefix}{hour:02}h.mp4"))
}

/// Resolve the hour announcement, falling back to the idle clip when the
/// hour-keyed file does not exist. The returned path is not guaranteed to
/// exist either; the engine re-checks before enqueueing.
pub fn resolve_hour_clip(dir: &Path, prefix: &str, hour: u32, fallback: &Path) -> PathBuf {
    let candidate = hour_clip_path(dir, prefix, hour);
    if candidate.exists() {
        candidate
    } else {
        fallback.to_path_buf()
    }
}

/// Path of the greeting clip for a weekday:
/// `<dir>/<prefix>good <weekday>.mp4`.
pub fn weekday_greeting_path(dir: &Path, prefix: &str, weekday: Weekday) -> PathBuf {
    let name = match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    };
    dir.join(format!("{prefix}good {name}.mp4"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_paths_are_zero_padded() {
        let dir = Path::new("/media/ann");
        assert_eq!(
            hour_clip_path(dir, "", 7),
            PathBuf::from("/media/ann/07h.mp4")
        );
        assert_eq!(
            hour_clip_path(dir, "c10 - ", 23),
            PathBuf::from("/media/ann/c10 - 23h.mp4")
        );
    }

    #[test]
    fn missing_hour_clip_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = Path::new("/media/idle.mp4");

        assert_eq!(
            resolve_hour_clip(dir.path(), "", 9, fallback),
            fallback.to_path_buf()
        );

        let present = dir.path().join("09h.mp4");
        std::fs::write(&present, b"clip").unwrap();
        assert_eq!(resolve_hour_clip(dir.path(), "", 9, fallback), present);
    }

    #[test]
    fn weekday_greeting_names() {
        let dir = Path::new("/media/ann");
        assert_eq!(
            weekday_greeting_path(dir, "", Weekday::Mon),
            PathBuf::from("/media/ann/good monday.mp4")
        );
        assert_eq!(
            weekday_greeting_path(dir, "kiosk ", Weekday::Sun),
            PathBuf::from("/media/ann/kiosk good sunday.mp4")
        );
    }
}
