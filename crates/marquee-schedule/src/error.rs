use thiserror::Error;

/// Errors that can occur while parsing and expanding schedule data.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The hour/minute field is neither blank, `*`, `*/N`, nor an integer.
    #[error("Invalid time expression '{expr}'")]
    InvalidExpression { expr: String },

    /// A literal time value lies outside its field's range.
    #[error("Time value {value} out of range 0..={max}")]
    OutOfRange { value: i64, max: u8 },

    /// A row could not be decoded (bad flag, bad integer column, …).
    #[error("Malformed schedule row: {0}")]
    MalformedRow(String),

    /// The schedule file itself could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
