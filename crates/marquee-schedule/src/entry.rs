use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::{Result, ScheduleError},
    expr::expand,
};

// Row layout: 7 weekday flags, HH, MM, jitter, duration, toast, action, tag.
// HH/MM are located by header name with these legacy positions as fallback.
const LEGACY_HOUR_COL: usize = 7;
const LEGACY_MINUTE_COL: usize = 8;
const JITTER_COL: usize = 9;
const DURATION_COL: usize = 10;
const TOAST_COL: usize = 11;
const ACTION_COL: usize = 12;
const TAG_COL: usize = 13;
const MIN_COLUMNS: usize = 14;

/// One expanded schedule row: a concrete (hour, minute) fire time plus the
/// shared weekday mask, jitter bound, and payload columns.
///
/// Entries live in a stable, index-addressable sequence; the index is the
/// identity used by [`DayState`](crate::daystate::DayState), so reloading
/// the schedule invalidates all prior daily state.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    /// Monday-first weekday eligibility flags.
    pub weekdays: [bool; 7],
    /// Concrete fire hour, `0..=23`.
    pub hour: u8,
    /// Concrete fire minute, `0..=59`.
    pub minute: u8,
    /// Original hour field, kept for traceability; not used in matching.
    pub hour_expr: String,
    /// Original minute field, kept for traceability; not used in matching.
    pub minute_expr: String,
    /// Upper bound (minutes) of the once-per-day random delay.
    pub jitter_bound_minutes: u32,
    /// Informational upper bound (seconds) for the triggered action's run.
    pub duration_secs: u32,
    /// Message shown at fire time.
    pub toast: Option<String>,
    /// Action-table key invoked at fire time.
    pub action: Option<String>,
    /// Opaque passthrough column, not interpreted by the engine.
    pub tag: String,
}

impl ScheduleEntry {
    pub fn eligible_on(&self, weekday: chrono::Weekday) -> bool {
        self.weekdays[weekday.num_days_from_monday() as usize]
    }

    /// Compact weekday mask for logs, e.g. `M-WTF--`.
    pub fn days_label(&self) -> String {
        const LETTERS: [char; 7] = ['M', 'T', 'W', 'T', 'F', 'S', 'S'];
        self.weekdays
            .iter()
            .zip(LETTERS)
            .map(|(&on, letter)| if on { letter } else { '-' })
            .collect()
    }

    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// Locate the HH/MM columns by header name, falling back to the legacy
/// positional layout when the header doesn't carry them.
fn header_columns(header: &str) -> (usize, usize) {
    let mut hour_col = LEGACY_HOUR_COL;
    let mut minute_col = LEGACY_MINUTE_COL;
    for (idx, col) in header.split(';').enumerate() {
        match col.trim().to_ascii_uppercase().as_str() {
            "HH" => hour_col = idx,
            "MM" => minute_col = idx,
            _ => {}
        }
    }
    (hour_col, minute_col)
}

/// Expand one data row into entries; one per (hour, minute) pair of the
/// expanded hour-set × minute-set cartesian product. All produced entries
/// share the row's weekday mask, jitter bound, duration, toast, action,
/// and tag.
fn expand_row(line: &str, hour_col: usize, minute_col: usize) -> Result<Vec<ScheduleEntry>> {
    let mut fields: Vec<String> = line.split(';').map(|f| f.trim().to_string()).collect();
    let width = MIN_COLUMNS.max(hour_col + 1).max(minute_col + 1);
    if fields.len() < width {
        fields.resize(width, String::new());
    }

    let mut weekdays = [false; 7];
    for (i, flag) in weekdays.iter_mut().enumerate() {
        *flag = parse_int_field(&fields[i])? != 0;
    }

    let hour_expr = fields[hour_col].clone();
    let minute_expr = fields[minute_col].clone();
    let jitter_bound_minutes = parse_int_field(&fields[JITTER_COL])?.max(0) as u32;
    let duration_secs = parse_int_field(&fields[DURATION_COL])?.max(0) as u32;
    let toast = non_empty(&fields[TOAST_COL]);
    let action = non_empty(&fields[ACTION_COL]);
    let tag = fields[TAG_COL].clone();

    let hours = expand(&hour_expr, 23)?;
    let minutes = expand(&minute_expr, 59)?;

    let mut entries = Vec::with_capacity(hours.len() * minutes.len());
    for &hour in &hours {
        for &minute in &minutes {
            entries.push(ScheduleEntry {
                weekdays,
                hour,
                minute,
                hour_expr: hour_expr.clone(),
                minute_expr: minute_expr.clone(),
                jitter_bound_minutes,
                duration_secs,
                toast: toast.clone(),
                action: action.clone(),
                tag: tag.clone(),
            });
        }
    }
    Ok(entries)
}

fn parse_int_field(raw: &str) -> Result<i64> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| ScheduleError::MalformedRow(format!("not an integer: '{raw}'")))
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Load and expand a `;`-separated schedule file.
///
/// The first line is a header (used to locate the HH/MM columns). Blank
/// rows are ignored; a row that fails to decode is logged with its line
/// number and skipped, so one bad row never takes down the rest of the
/// schedule. Only file-level I/O errors propagate.
pub fn load_schedule(path: &Path) -> Result<Vec<ScheduleEntry>> {
    let raw = std::fs::read_to_string(path)?;
    let mut lines = raw.lines();

    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let (hour_col, minute_col) = header_columns(header);

    let mut entries = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line_no = offset + 2; // header is line 1
        if line.split(';').all(|f| f.trim().is_empty()) {
            continue;
        }
        match expand_row(line, hour_col, minute_col) {
            Ok(expanded) => {
                debug!(line = line_no, count = expanded.len(), "schedule row expanded");
                entries.extend(expanded);
            }
            Err(e) => warn!(line = line_no, error = %e, "schedule row skipped"),
        }
    }

    info!(path = %path.display(), count = entries.len(), "schedule loaded");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "MO;TU;WE;TH;FR;SA;SU;HH;MM;RND;DUR;TEXT;ACTION;DATA";

    fn write_schedule(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn plain_row_yields_one_entry() {
        let file = write_schedule(&["1;1;1;1;1;0;0;9;30;5;60;Hello;ACT_GREET;FF"]);
        let entries = load_schedule(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.weekdays, [true, true, true, true, true, false, false]);
        assert_eq!((e.hour, e.minute), (9, 30));
        assert_eq!(e.jitter_bound_minutes, 5);
        assert_eq!(e.duration_secs, 60);
        assert_eq!(e.toast.as_deref(), Some("Hello"));
        assert_eq!(e.action.as_deref(), Some("ACT_GREET"));
        assert_eq!(e.tag, "FF");
        assert_eq!(e.days_label(), "MTWTF--");
    }

    #[test]
    fn wildcard_row_expands_cartesian_product() {
        let file = write_schedule(&["1;0;0;0;0;0;0;*;*/30;0;10;;ACT_X;FF"]);
        let entries = load_schedule(file.path()).unwrap();
        // 24 hours x {0, 30}
        assert_eq!(entries.len(), 48);
        assert!(entries.iter().all(|e| e.minute == 0 || e.minute == 30));
        assert!(entries.iter().all(|e| e.hour <= 23));
        // Shared payload across the expansion.
        assert!(entries.iter().all(|e| e.action.as_deref() == Some("ACT_X")));
        assert!(entries.iter().all(|e| e.hour_expr == "*"));
        assert!(entries.iter().all(|e| e.minute_expr == "*/30"));
    }

    #[test]
    fn bad_rows_are_skipped_good_rows_survive() {
        let file = write_schedule(&[
            "1;1;1;1;1;1;1;99;0;0;10;;ACT_BAD;FF", // hour out of range
            "1;1;1;1;1;1;1;8;15;0;10;;ACT_OK;FF",
            "x;1;1;1;1;1;1;8;15;0;10;;ACT_ALSO_BAD;FF", // bad weekday flag
        ]);
        let entries = load_schedule(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action.as_deref(), Some("ACT_OK"));
    }

    #[test]
    fn blank_rows_and_empty_payload_columns() {
        let file = write_schedule(&[
            ";;;;;;;;;;;;;",
            "0;0;0;0;0;1;1;12;0;;;;;",
        ]);
        let entries = load_schedule(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.jitter_bound_minutes, 0);
        assert!(e.toast.is_none());
        assert!(e.action.is_none());
        assert_eq!(e.days_label(), "-----SS");
    }

    #[test]
    fn header_names_override_legacy_positions() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // HH/MM live in swapped positions; the header locates them.
        writeln!(file, "MO;TU;WE;TH;FR;SA;SU;MM;HH;RND;DUR;TEXT;ACTION;DATA").unwrap();
        writeln!(file, "1;0;0;0;0;0;0;45;7;0;10;;ACT_SWAP;FF").unwrap();
        let entries = load_schedule(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!((entries[0].hour, entries[0].minute), (7, 45));
    }

    #[test]
    fn short_row_is_padded() {
        let file = write_schedule(&["1;1;1;1;1;1;1;6;30"]);
        let entries = load_schedule(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].toast.is_none());
        assert_eq!(entries[0].tag, "");
    }
}
