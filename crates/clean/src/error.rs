use cellscrub_pipeline::{HostError, PipelineError};
use thiserror::Error;

/// Errors from the settings store
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for '{path}': {source}")]
    InvalidValue {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Unknown settings category: {0}")]
    UnknownCategory(String),
}

/// Errors building a find/replace transform
#[derive(Error, Debug)]
pub enum ReplaceError {
    #[error("Find text must not be empty")]
    EmptyFind,

    #[error("Invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// Errors from cleaning operations
#[derive(Error, Debug)]
pub enum CleanError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Replace(#[from] ReplaceError),

    #[error("Unknown case mode: {0}")]
    UnknownCase(String),

    #[error("Unknown cleanup operation: {0}")]
    UnknownOperation(String),

    #[error("Nothing to undo")]
    NothingToUndo,
}

pub type Result<T> = std::result::Result<T, CleanError>;
