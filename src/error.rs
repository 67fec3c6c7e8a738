use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecurError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),

    #[error("Unknown transaction type: {0}")]
    UnknownType(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unknown recurrence: {0}")]
    UnknownRecurrence(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RecurError>;
