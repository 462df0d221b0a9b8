//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage (StorageFailure)
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0} (use HH:MM or HH:MM:SS)")]
    InvalidTime(String),

    // ---------------------------
    // Ledger / lifecycle errors
    // ---------------------------
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Ambiguous session id '{prefix}': {count} sessions share this prefix")]
    Ambiguous { prefix: String, count: usize },

    #[error("A session is already active (started {started_at}, id {id})")]
    AlreadyActive { id: String, started_at: String },

    #[error("No active session found")]
    NoActiveSession,

    #[error("Session {0} is not the active session")]
    NotActive(String),

    // ---------------------------
    // Archive errors
    // ---------------------------
    #[error("No sessions found for {0}")]
    EmptyMonth(String),

    #[error("Archive not found: {0}")]
    ArchiveNotFound(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] serde_yaml::Error),

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True when the error only says "there was nothing to archive".
    pub fn is_empty_month(&self) -> bool {
        matches!(self, AppError::EmptyMonth(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
