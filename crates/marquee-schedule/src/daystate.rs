use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDateTime};
use rand::Rng;

use crate::entry::ScheduleEntry;

/// Per-day bookkeeping for the loaded schedule: one sampled jitter offset
/// and one fired flag per entry index.
///
/// Entry identity is the index into the loaded schedule sequence, not the
/// entry's content; a schedule reload must therefore be paired with
/// [`DayState::reset_for_new_day`]. State lives for the process lifetime
/// only and resets at every local-date rollover.
#[derive(Debug, Default)]
pub struct DayState {
    /// Entry index -> today's jitter offset in minutes. Written once per
    /// index per day, never changed until the next reset.
    offsets: HashMap<usize, i64>,
    /// Entry index -> fired today. Monotone false -> true between resets.
    fired: HashMap<usize, bool>,
}

impl DayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all offsets and fired flags. Called at local-date rollover and
    /// after a schedule reload.
    pub fn reset_for_new_day(&mut self) {
        self.offsets.clear();
        self.fired.clear();
    }

    /// Sample a jitter offset for every entry index not yet seen today and
    /// make sure a fired flag exists for it.
    ///
    /// Idempotent: indices already seeded keep their offset and flag, so
    /// calling this on every tick is safe.
    pub fn ensure_seeded(&mut self, entries: &[ScheduleEntry]) {
        let mut rng = rand::thread_rng();
        for (idx, entry) in entries.iter().enumerate() {
            self.offsets.entry(idx).or_insert_with(|| {
                if entry.jitter_bound_minutes == 0 {
                    0
                } else {
                    rng.gen_range(0..=entry.jitter_bound_minutes as i64)
                }
            });
            self.fired.entry(idx).or_insert(false);
        }
    }

    /// Threshold firing test: true once `now` has reached or passed the
    /// entry's fire instant (its hour:minute plus today's jitter offset) on
    /// an eligible weekday, provided the entry has not fired today.
    ///
    /// `>=` rather than exact-second equality: a delayed tick or a late
    /// startup still fires the entry the same day (catch-up), and the fired
    /// flag keeps it at most once per day.
    pub fn should_fire(&self, idx: usize, entry: &ScheduleEntry, now: NaiveDateTime) -> bool {
        if !entry.eligible_on(now.weekday()) {
            return false;
        }
        if self.has_fired(idx) {
            return false;
        }
        let offset = self.offsets.get(&idx).copied().unwrap_or(0);
        let Some(nominal) = now
            .date()
            .and_hms_opt(entry.hour as u32, entry.minute as u32, 0)
        else {
            return false;
        };
        now >= nominal + Duration::minutes(offset)
    }

    /// Record that the entry fired today. Idempotent.
    pub fn mark_fired(&mut self, idx: usize) {
        self.fired.insert(idx, true);
    }

    pub fn has_fired(&self, idx: usize) -> bool {
        self.fired.get(&idx).copied().unwrap_or(false)
    }

    /// Today's sampled offset for the entry, if it has been seeded.
    pub fn offset_minutes(&self, idx: usize) -> Option<i64> {
        self.offsets.get(&idx).copied()
    }
}
