//! # Error Types
//!
//! Structured error types for beamnote_core. Each variant carries enough
//! context (file, column, row) for a user to find the offending input
//! without re-running under a debugger.
//!
//! ## Example
//!
//! ```rust
//! use beamnote_core::errors::{NoteError, NoteResult};
//!
//! fn validate_stride(stride: usize) -> NoteResult<()> {
//!     if stride == 0 {
//!         return Err(NoteError::invalid_input("stride", "0", "Stride must be at least 1"));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beamnote_core operations
pub type NoteResult<T> = Result<T, NoteError>;

/// Structured error type for note generation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum NoteError {
    /// A configuration value is invalid
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The spreadsheet has no column with the expected header
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: String },

    /// A data cell could not be read as a number
    #[error("Invalid value in {path}, row {row}, column '{column}': {value:?} is not a number")]
    InvalidCell {
        path: String,
        row: usize,
        column: String,
        value: String,
    },

    /// The input file extension is not a known spreadsheet format
    #[error("Unsupported input format '{extension}' for {path}")]
    UnsupportedFormat { extension: String, path: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// The external typesetting compiler could not be started
    #[error("Compiler '{compiler}' is not available: {reason}")]
    CompilerUnavailable { compiler: String, reason: String },

    /// The typesetting compiler rejected the document
    #[error("{compiler} compilation failed: {message}")]
    CompileFailed { compiler: String, message: String },
}

impl NoteError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        NoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingColumn error
    pub fn missing_column(column: impl Into<String>, path: impl Into<String>) -> Self {
        NoteError::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        NoteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a CompileFailed error
    pub fn compile_failed(compiler: impl Into<String>, message: impl Into<String>) -> Self {
        NoteError::CompileFailed {
            compiler: compiler.into(),
            message: message.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            NoteError::InvalidInput { .. } => "INVALID_INPUT",
            NoteError::MissingColumn { .. } => "MISSING_COLUMN",
            NoteError::InvalidCell { .. } => "INVALID_CELL",
            NoteError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            NoteError::FileError { .. } => "FILE_ERROR",
            NoteError::SerializationError { .. } => "SERIALIZATION_ERROR",
            NoteError::CompilerUnavailable { .. } => "COMPILER_UNAVAILABLE",
            NoteError::CompileFailed { .. } => "COMPILE_FAILED",
        }
    }
}
