//! Error handling for worksheet parsing operations.
//!
//! Errors are grouped by how far they reach: file-level errors abort one
//! workbook, sheet-level errors abort one worksheet, and data-level errors
//! abort the worksheet whose row raised them. Column-level schema problems
//! are never errors; they are logged and the column is dropped.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported workbook format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("CSV error in file: {path} - {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error in file: {path} - {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Sheet '{sheet}' has no dimension information")]
    MissingDimensions { sheet: String },

    #[error("No schema found in sheet '{sheet}': {reason}")]
    NoSchema { sheet: String, reason: String },

    #[error("Failed to read cell in sheet '{sheet}' at row {row}, column {column}: {reason}")]
    CellRead {
        sheet: String,
        row: usize,
        column: usize,
        reason: String,
    },

    #[error("No type declared for path '{path}' in sheet '{sheet}' (row {row})")]
    MissingType {
        sheet: String,
        row: usize,
        path: String,
    },

    #[error("Column {column} in sheet '{sheet}' declares an empty var path (row {row})")]
    MissingVarPath {
        sheet: String,
        row: usize,
        column: usize,
    },

    #[error(
        "Path '{path}' in sheet '{sheet}' is used both as a value and as an object (row {row}, column {column})"
    )]
    PathConflict {
        sheet: String,
        row: usize,
        column: usize,
        path: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing failed for {path}: {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },
}

impl SheetError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a "no schema" error for a sheet
    pub fn no_schema(sheet: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoSchema {
            sheet: sheet.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while reading a data row
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::CellRead { .. }
                | Self::MissingType { .. }
                | Self::MissingVarPath { .. }
                | Self::PathConflict { .. }
        )
    }

    /// True for errors that abort a single worksheet before any row is read
    pub fn is_sheet_error(&self) -> bool {
        matches!(self, Self::MissingDimensions { .. } | Self::NoSchema { .. })
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
