//! Core data structures shared by the parsing pipeline.
//!
//! Defines per-column header schemas, the per-sheet schema built from the
//! header block, parse results and batch processing statistics.

use crate::constants::{keywords, output_keys};
use crate::value::{Record, Value};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

/// Header values collected for one data-bearing column
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSchema {
    /// 1-based column index
    pub column: usize,

    /// Keyword (folded) to non-empty values, top-to-bottom
    pub values: IndexMap<String, Vec<String>>,

    /// Last non-empty `default` value of the column
    pub default_value: Option<String>,
}

impl ColumnSchema {
    pub fn new(column: usize) -> Self {
        Self {
            column,
            values: IndexMap::new(),
            default_value: None,
        }
    }

    /// Append a value under a keyword
    pub fn push(&mut self, keyword: &str, value: impl Into<String>) {
        let value = value.into();
        if keyword == keywords::DEFAULT {
            self.default_value = Some(value.clone());
        }
        self.values.entry(keyword.to_string()).or_default().push(value);
    }

    /// Values collected under a keyword
    pub fn get(&self, keyword: &str) -> &[String] {
        self.values.get(keyword).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Field path segments from the `var` rows
    pub fn var_path(&self) -> &[String] {
        self.get(keywords::VAR)
    }

    /// Type tags aligned with [`Self::var_path`]
    pub fn types(&self) -> &[String] {
        self.get(keywords::TYPE)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }
}

/// Everything the header block of one worksheet declares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetSchema {
    /// Columns that survived validation, in column order
    pub columns: Vec<ColumnSchema>,

    /// Field path to type tag, one entry per path prefix
    pub path_types: IndexMap<String, String>,

    /// Deepest field path to default text
    pub path_defaults: IndexMap<String, String>,

    /// Values of unrecognized header keywords
    pub metadata: IndexMap<String, String>,

    /// Number of header rows; data starts on the next row
    pub header_rows: usize,

    /// Rows considered after applying the row limit
    pub rows: usize,
}

impl SheetSchema {
    /// First data row (1-based)
    pub fn data_start_row(&self) -> usize {
        self.header_rows + 1
    }
}

/// Parsed contents of one worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetResult {
    pub sheet: String,
    pub path_types: IndexMap<String, String>,
    pub records: Vec<Record>,
    pub metadata: IndexMap<String, String>,
}

impl SheetResult {
    /// Output mapping: reserved keys first, then metadata keys
    pub fn to_value(&self) -> Value {
        let mut out = Record::new();
        out.insert(
            output_keys::SHEET.to_string(),
            Value::scalar(self.sheet.as_str()),
        );
        out.insert(
            output_keys::TYPES.to_string(),
            Value::Record(
                self.path_types
                    .iter()
                    .map(|(path, tag)| (path.clone(), Value::scalar(tag.as_str())))
                    .collect(),
            ),
        );
        out.insert(
            output_keys::RECORDS.to_string(),
            Value::List(self.records.iter().cloned().map(Value::Record).collect()),
        );
        for (key, value) in &self.metadata {
            if output_keys::RESERVED.contains(&key.as_str()) {
                warn!(
                    "Sheet '{}': metadata key '{}' collides with a reserved output key, skipping",
                    self.sheet, key
                );
                continue;
            }
            out.insert(key.clone(), Value::scalar(value.as_str()));
        }
        Value::Record(out)
    }
}

impl Serialize for SheetResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// A sheet that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetFailure {
    pub sheet: String,
    pub reason: String,
}

/// Parsed contents of one workbook file
#[derive(Debug, Clone, Default)]
pub struct WorkbookResult {
    pub path: PathBuf,
    pub sheets: Vec<SheetResult>,
    pub failures: Vec<SheetFailure>,
}

impl WorkbookResult {
    pub fn record_count(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.records.len()).sum()
    }

    /// Sheet name to sheet output mapping, in workbook order.
    ///
    /// A repeated sheet name is keyed as `Name (2)`, `Name (3)`, ... so no
    /// sheet is lost; the sheet's own `sheet` field keeps the real name.
    pub fn to_value(&self) -> Value {
        let mut out = Record::new();
        for sheet in &self.sheets {
            let key = unique_key(&out, &sheet.sheet);
            if key != sheet.sheet {
                warn!(
                    "{}: duplicate sheet name '{}', writing it as '{}'",
                    self.path.display(),
                    sheet.sheet,
                    key
                );
            }
            out.insert(key, sheet.to_value());
        }
        Value::Record(out)
    }
}

/// `name`, or the first `name (n)` not yet used in `out`
fn unique_key(out: &Record, name: &str) -> String {
    if !out.contains_key(name) {
        return name.to_string();
    }
    (2..)
        .map(|n| format!("{} ({})", name, n))
        .find(|key| !out.contains_key(key))
        .unwrap_or_else(|| name.to_string())
}

/// Processing statistics for a batch conversion
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub sheets_parsed: usize,
    pub sheets_failed: usize,
    pub total_records: usize,
    /// The output directory; without one, the deepest directory holding
    /// every input (outputs are written next to their inputs)
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Fold one workbook's outcome into the totals
    pub fn record_workbook(&mut self, workbook: &WorkbookResult) {
        self.files_processed += 1;
        self.sheets_parsed += workbook.sheets.len();
        self.sheets_failed += workbook.failures.len();
        self.total_records += workbook.record_count();
    }
}
