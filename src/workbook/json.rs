//! JSON workbook loader.
//!
//! Layout:
//!
//! ```json
//! {
//!   "sheets": [
//!     {
//!       "name": "Inventory",
//!       "rows": [["#var", "Items"], ["#type", "list"]],
//!       "merged": [{"first_row": 1, "first_col": 2, "last_row": 1, "last_col": 3}]
//!     }
//!   ]
//! }
//! ```
//!
//! Cells may be strings, numbers, booleans or null; non-string cells are
//! read as their JSON text and null as blank.

use crate::error::{Result, SheetError};
use crate::worksheet::{GridSheet, MergedRange};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Deserialize, Debug, Default)]
struct JsonWorkbook {
    #[serde(default)]
    sheets: Vec<JsonSheet>,
}

#[derive(Deserialize, Debug)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    merged: Vec<MergedRange>,
}

impl JsonSheet {
    fn into_grid(self) -> GridSheet {
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect::<Vec<String>>());
        GridSheet::from_rows(self.name, rows).with_merged(self.merged)
    }
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Read a JSON workbook file
pub fn read_json_workbook(path: &Path) -> Result<Vec<GridSheet>> {
    let file = File::open(path)?;
    let workbook: JsonWorkbook =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| SheetError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(workbook.sheets.into_iter().map(JsonSheet::into_grid).collect())
}

/// Parse a JSON workbook from text
pub fn parse_json_workbook(text: &str) -> std::result::Result<Vec<GridSheet>, serde_json::Error> {
    let workbook: JsonWorkbook = serde_json::from_str(text)?;
    Ok(workbook.sheets.into_iter().map(JsonSheet::into_grid).collect())
}
