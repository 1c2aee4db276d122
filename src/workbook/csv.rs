//! CSV worksheet loader.
//!
//! Semantics:
//! - One file is one worksheet, named after the file stem.
//! - UTF-8 only; ragged rows are allowed and read as blank past their end.
//! - No merged cells.

use crate::error::{Result, SheetError};
use crate::worksheet::GridSheet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read a CSV file into a single worksheet
pub fn read_csv_sheet(path: &Path) -> Result<GridSheet> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Sheet1".to_string());
    let file = File::open(path)?;
    read_csv_from_reader(name, BufReader::new(file)).map_err(|source| SheetError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Read CSV text from any reader into a worksheet with the given name
pub fn read_csv_from_reader<R: Read>(
    name: impl Into<String>,
    reader: R,
) -> std::result::Result<GridSheet, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut sheet = GridSheet::new(name);
    for record in rdr.records() {
        let record = record?;
        sheet.push_row(record.iter().map(str::to_string).collect());
    }
    Ok(sheet)
}
