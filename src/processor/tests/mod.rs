//! Tests for the batch conversion engine
//!
//! Drives the processor over small CSV and JSON workbooks written to
//! temporary directories.

pub mod error_handling;

use std::fs;
use std::path::{Path, PathBuf};

/// Inventory sheet with one plain column and one list column
pub const INVENTORY_CSV: &str = "\
#var,Id,Items,Items
#var,,Name,Count
#type,int,list,list
#type,,string,int
#default,0,,1
,1,Sword,2
,,Shield,
,2,Potion,5
";

/// Two-sheet workbook; the second sheet has no header and fails
pub const TWO_SHEET_JSON: &str = r##"{
  "sheets": [
    {
      "name": "Players",
      "rows": [
        ["#var", "Name", "Level"],
        ["#type", "string", "int"],
        ["#description", "Player roster"],
        ["", "Alice", 3],
        ["", "Bob", null]
      ]
    },
    {
      "name": "Notes",
      "rows": [["just", "text"]]
    }
  ]
}"##;

/// Write `contents` to `dir/name` and return the path
pub fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

/// Read and parse a produced output file
pub fn read_output(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}
