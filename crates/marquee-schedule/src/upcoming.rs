use chrono::{Datelike, Duration, NaiveDateTime};

use crate::entry::ScheduleEntry;

/// Find the next eligible (entry index, nominal fire time) at or after
/// `now`, scanning today plus the following six days.
///
/// Jitter is not applied; this feeds display and logging, not firing
/// decisions. Ties resolve to the lowest entry index.
pub fn next_upcoming(
    entries: &[ScheduleEntry],
    now: NaiveDateTime,
) -> Option<(usize, NaiveDateTime)> {
    let mut best: Option<(usize, NaiveDateTime)> = None;

    for day_offset in 0..7 {
        let date = now.date() + Duration::days(day_offset);
        let weekday = date.weekday();
        for (idx, entry) in entries.iter().enumerate() {
            if !entry.eligible_on(weekday) {
                continue;
            }
            let Some(candidate) = date.and_hms_opt(entry.hour as u32, entry.minute as u32, 0)
            else {
                continue;
            };
            if candidate < now {
                continue;
            }
            match best {
                Some((_, current)) if current <= candidate => {}
                _ => best = Some((idx, candidate)),
            }
        }
    }

    best
}
