//! Cell-access boundary between the parser and workbook containers.
//!
//! The parser never opens files itself. It only needs a sheet name, the
//! sheet's extent and cell text by 1-based (row, column), with merged
//! ranges resolved to their top-left anchor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed cell lookup reported by a worksheet implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CellReadError(pub String);

/// Used extent of a worksheet (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
}

/// Rectangular merged range; every cell inside reads as the anchor cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl MergedRange {
    pub fn contains(&self, row: usize, column: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&column)
    }

    pub fn anchor(&self) -> (usize, usize) {
        (self.first_row, self.first_col)
    }
}

/// Read access to one worksheet
pub trait Worksheet {
    /// Worksheet name used in results and error context
    fn name(&self) -> &str;

    /// Used extent, or `None` when the container reports no dimension info
    fn dimensions(&self) -> Option<Dimensions>;

    /// Text of a single cell without merge resolution
    fn raw_cell(&self, row: usize, column: usize) -> Result<Option<&str>, CellReadError>;

    /// Anchor of the merged range covering the cell, if any
    fn merged_anchor(&self, _row: usize, _column: usize) -> Option<(usize, usize)> {
        None
    }

    /// Cell text with merged ranges resolved to their anchor
    fn cell_text(&self, row: usize, column: usize) -> Result<Option<&str>, CellReadError> {
        match self.merged_anchor(row, column) {
            Some((anchor_row, anchor_col)) => self.raw_cell(anchor_row, anchor_col),
            None => self.raw_cell(row, column),
        }
    }
}

/// Row-major in-memory worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSheet {
    name: String,
    rows: Vec<Vec<String>>,
    merged: Vec<MergedRange>,
}

impl GridSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            merged: Vec::new(),
        }
    }

    /// Build a sheet from row-major cell text
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            merged: Vec::new(),
        }
    }

    /// Attach merged ranges
    pub fn with_merged(mut self, merged: Vec<MergedRange>) -> Self {
        self.merged = merged;
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn merged_ranges(&self) -> &[MergedRange] {
        &self.merged
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Worksheet for GridSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimensions(&self) -> Option<Dimensions> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        Some(Dimensions {
            rows: self.rows.len(),
            columns,
        })
    }

    fn raw_cell(&self, row: usize, column: usize) -> Result<Option<&str>, CellReadError> {
        if row == 0 || column == 0 {
            return Err(CellReadError(format!(
                "cell ({}, {}) is outside the 1-based grid",
                row, column
            )));
        }
        Ok(self
            .rows
            .get(row - 1)
            .and_then(|cells| cells.get(column - 1))
            .map(String::as_str))
    }

    fn merged_anchor(&self, row: usize, column: usize) -> Option<(usize, usize)> {
        self.merged
            .iter()
            .find(|range| range.contains(row, column))
            .map(MergedRange::anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_rows_report_widest_extent() {
        let sheet = GridSheet::from_rows("s", vec![vec!["a"], vec!["b", "c", "d"]]);
        assert_eq!(
            sheet.dimensions(),
            Some(Dimensions {
                rows: 2,
                columns: 3
            })
        );
        assert_eq!(sheet.cell_text(1, 3).unwrap(), None);
        assert_eq!(sheet.cell_text(2, 3).unwrap(), Some("d"));
    }

    #[test]
    fn test_merged_cells_resolve_to_anchor() {
        let sheet = GridSheet::from_rows("s", vec![vec!["#var", "Items", ""]]).with_merged(vec![
            MergedRange {
                first_row: 1,
                first_col: 2,
                last_row: 1,
                last_col: 3,
            },
        ]);
        assert_eq!(sheet.cell_text(1, 3).unwrap(), Some("Items"));
        assert_eq!(sheet.raw_cell(1, 3).unwrap(), Some(""));
    }

    #[test]
    fn test_zero_index_is_a_read_error() {
        let sheet = GridSheet::from_rows("s", vec![vec!["a"]]);
        assert!(sheet.cell_text(0, 1).is_err());
    }
}
