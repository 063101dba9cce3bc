use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnbnError {
    #[error("Board file not found: {}", .0.display())]
    BoardNotFound(PathBuf),

    #[error("Board file already exists: {}", .0.display())]
    BoardExists(PathBuf),

    #[error("Task with ID {0} not found")]
    TaskNotFound(u64),

    #[error("Column with name \"{0}\" not found")]
    ColumnNotFound(String),

    #[error("Column with name \"{0}\" already exists")]
    ColumnExists(String),

    #[error("Cannot remove column \"{name}\" because it contains {count} task(s)")]
    ColumnNotEmpty { name: String, count: usize },

    #[error("Label with name \"{0}\" not found")]
    LabelNotFound(String),

    #[error("Label with name \"{0}\" already exists")]
    LabelExists(String),

    #[error("Sprint with name \"{0}\" not found")]
    SprintNotFound(String),

    #[error("Sprint with name \"{0}\" already exists")]
    SprintExists(String),

    #[error("Sprint end date must not be before its start date")]
    InvalidSprintDates,

    #[error("invalid board file format: {0}")]
    InvalidFormat(String),

    #[error("unsupported board version: {0}")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, KnbnError>;
