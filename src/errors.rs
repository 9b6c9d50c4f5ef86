//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / storage (fatal for the current operation)
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Line {line}: invalid input format '{content}' (expected {expected} comma-separated fields)")]
    MalformedLine {
        line: usize,
        content: String,
        expected: usize,
    },

    #[error("Line {line}: invalid class number '{value}'")]
    InvalidClassNumber { line: usize, value: String },

    #[error("Invalid category '{0}'. Use one of: C, F, H, D, S (or 'all' as a filter)")]
    InvalidCategory(String),

    #[error("Please enter a valid event name")]
    EmptyEventName,

    #[error("The {0} must not be empty")]
    EmptyField(&'static str),

    #[error("No student data provided")]
    NoStudentData,

    #[error("Invalid student key '{0}' (expected: class,class_number,name)")]
    InvalidStudentKey(String),

    // ---------------------------
    // Lookup misses
    // ---------------------------
    #[error("Student {name} ({class}, #{class_number}) not found in the database")]
    StudentNotFound {
        class: String,
        class_number: i64,
        name: String,
    },

    #[error("Event '{0}' not found in the database")]
    EventNotFound(String),

    // ---------------------------
    // Uniqueness
    // ---------------------------
    #[error("Student {name} ({class}, #{class_number}) already exists")]
    DuplicateStudent {
        class: String,
        class_number: i64,
        name: String,
    },

    #[error("Event '{0}' already exists")]
    DuplicateEvent(String),

    #[error("The event '{0}' already exists (use --yes to add students to it)")]
    EventExists(String),

    // ---------------------------
    // Undo history
    // ---------------------------
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("History error: {0}")]
    History(String),

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

impl AppError {
    /// Storage-level failures abort the whole operation; everything else is a
    /// problem with the user's input.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            AppError::Io(_) | AppError::Db(_) | AppError::Serialization(_) | AppError::Csv(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
