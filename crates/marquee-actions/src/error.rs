use thiserror::Error;

/// Errors that can occur while loading the action table.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The script file's top level is not a JSON object.
    #[error("Action script root must be a JSON object")]
    InvalidRoot,

    /// The script file is not valid JSON at all.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The script file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ActionError>;
