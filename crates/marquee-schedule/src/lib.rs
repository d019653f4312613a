//! `marquee-schedule` — calendar-driven firing decisions for the kiosk.
//!
//! # Overview
//!
//! A schedule is a list of rows, each carrying seven weekday flags, an hour
//! field, a minute field, a jitter bound, a duration, and optional toast
//! text / action name. Hour and minute fields accept cron-like expressions;
//! a row expands into one [`ScheduleEntry`] per (hour, minute) pair of the
//! cartesian product. [`DayState`] owns the per-day bookkeeping (one random
//! jitter offset and one fired flag per entry index) that makes each entry
//! fire at most once per local calendar day.
//!
//! # Time expressions
//!
//! | Form    | Expansion                                  |
//! |---------|--------------------------------------------|
//! | (blank) | `{0}`                                      |
//! | `*`     | `{0, 1, …, max}`                           |
//! | `*/N`   | `{0, N, 2N, …} ∩ [0, max]` (N > 0)         |
//! | `V`     | `{V}` when `0 <= V <= max`                 |
//!
//! Anything else is an [`error::ScheduleError`]; a row with a bad field is
//! skipped at load time, never fatal.

pub mod daystate;
pub mod entry;
pub mod error;
pub mod expr;
pub mod upcoming;

pub use daystate::DayState;
pub use entry::{load_schedule, ScheduleEntry};
pub use error::{Result, ScheduleError};
pub use expr::expand;
pub use upcoming::next_upcoming;
