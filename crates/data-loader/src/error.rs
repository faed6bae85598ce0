//! Error types for the data-loader crate.
//!
//! Loading the catalogue and the per-user history lists can fail in a
//! handful of well-defined ways. Each variant carries enough context
//! (file, line, offending value) to point at the broken input.

use thiserror::Error;

/// Errors that can occur while loading the catalogue or history lists.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same film id appears twice in the catalogue
    #[error("Duplicate film id in catalogue: {id}")]
    DuplicateFilm { id: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
