//! Workbook loaders producing in-memory worksheets.
//!
//! - [`csv`] - A CSV file is a single-sheet workbook named after the file stem
//! - [`json`] - A JSON workbook holds ordered sheets with optional merged ranges

pub mod csv;
pub mod json;

use crate::error::{Result, SheetError};
use crate::worksheet::GridSheet;
use std::path::Path;
use tracing::debug;

/// Container formats understood by [`load_workbook`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Csv,
    Json,
}

impl WorkbookFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        match extension.as_str() {
            "csv" => Some(WorkbookFormat::Csv),
            "json" => Some(WorkbookFormat::Json),
            _ => None,
        }
    }
}

/// Load every worksheet of a workbook file, in workbook order
pub fn load_workbook(path: &Path) -> Result<Vec<GridSheet>> {
    if !path.exists() {
        return Err(SheetError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let sheets = match WorkbookFormat::from_path(path) {
        Some(WorkbookFormat::Csv) => vec![csv::read_csv_sheet(path)?],
        Some(WorkbookFormat::Json) => json::read_json_workbook(path)?,
        None => {
            return Err(SheetError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    debug!("Loaded {} sheet(s) from {}", sheets.len(), path.display());
    Ok(sheets)
}
