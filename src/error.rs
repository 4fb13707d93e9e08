use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Failure acquiring or parsing one of the four input tables.
///
/// Always fatal to a load call: no partial tables are returned.
#[derive(ThisError, Debug)]
pub enum LoadError {
    #[error("Source not found: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("IO error reading {source_name}: {message}")]
    Io { source_name: String, message: String },

    #[error("CSV error in {source_name}: {message}")]
    Csv { source_name: String, message: String },

    #[error("{source_name} is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    #[error("{source_name} row {row}: unparseable date '{value}'")]
    InvalidDate {
        source_name: String,
        row: usize,
        value: String,
    },

    #[error("{source_name} row {row}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        source_name: String,
        row: usize,
        column: String,
        value: String,
    },
}

/// Failure talking to the external text service.
///
/// Never propagated past the assistant; rendered as plain text instead.
#[derive(ThisError, Debug)]
pub enum AssistantError {
    #[error("text service is not configured")]
    Unavailable,

    #[error("{0}")]
    Service(String),
}

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;
