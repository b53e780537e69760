//! Error types for notify.
//!
//! Only boundary failures live here: user input that cannot be parsed and
//! storage that cannot be read or written. A missing task is not an error at
//! the repository level (lookups return `Option`), and broken task invariants
//! are programming errors that panic.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::TaskId;

/// Main error type for notify operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid date '{0}'. Use YYYY-MM-DD, 'today' or 'tomorrow'.")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Use HH:MM.")]
    InvalidTime(String),

    #[error("Date range starts on {start} but ends earlier, on {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("A start date needs an end date")]
    MissingEndDate,

    #[error("A time of day needs a date")]
    TimeWithoutDate,

    #[error("Task name cannot be empty")]
    EmptyName,

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt task database {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Task {id} in {} has an empty name or is missing its dates", path.display())]
    InvalidTask { path: PathBuf, id: TaskId },
}

/// Result type alias for notify operations.
pub type Result<T> = std::result::Result<T, Error>;
