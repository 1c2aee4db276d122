//! Tests for the row-to-record pipeline stages
//!
//! Shared fixtures build a schema from a small header block so each stage
//! can be exercised with the same context the sheet parser would use.

pub mod normalizer_tests;

use crate::config::ParserConfig;
use crate::header::{SchemaRules, extract_schema};
use crate::models::SheetSchema;
use crate::value::{Record, Value};
use crate::worksheet::GridSheet;

/// Header block for an inventory sheet:
/// `Id` (int, default 0), `Items` (list of {Name, Tags (list of string)})
/// and `Stats.HP` (int, default 100)
pub fn inventory_header() -> Vec<Vec<&'static str>> {
    vec![
        vec!["#var", "Id", "Items", "Items", "Stats"],
        vec!["#var", "", "Name", "Tags", "HP"],
        vec!["#type", "int", "list", "list", "obj"],
        vec!["#type", "", "string", "list", "int"],
        vec!["#default", "0", "", "", "100"],
    ]
}

/// Build a sheet from the inventory header plus data rows
pub fn inventory_sheet(data: Vec<Vec<&'static str>>) -> GridSheet {
    let mut rows = inventory_header();
    rows.extend(data);
    GridSheet::from_rows("Inventory", rows)
}

/// Extract the schema of a sheet with the default configuration
pub fn schema_for(sheet: &GridSheet, config: &ParserConfig) -> SheetSchema {
    let rules = SchemaRules::new(config.clone()).unwrap();
    extract_schema(sheet, &rules).unwrap()
}

/// Record literal helper
pub fn record(fields: Vec<(&str, Value)>) -> Record {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub fn scalar(text: &str) -> Value {
    Value::scalar(text)
}

pub fn list(items: Vec<Value>) -> Value {
    Value::List(items)
}
