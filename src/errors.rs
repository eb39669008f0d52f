//! Unified application error type.
//! All modules (db, core, scheduler, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Caller-facing failures
    // ---------------------------
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Reminder side effects
    // ---------------------------
    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

/// Coarse classification used when a failure is reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Internal,
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(AppError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            AppError::Validation("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::Db(rusqlite::Error::InvalidQuery).kind(),
            ErrorKind::Internal
        );
        assert_eq!(AppError::Notify("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn caller_facing_messages_are_bare() {
        let e = AppError::NotFound("No exercise session in progress".into());
        assert_eq!(e.to_string(), "No exercise session in progress");
    }
}
