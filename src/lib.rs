//! Sheet Records Library
//!
//! Compiles header-annotated worksheets into nested, typed records.
//!
//! A worksheet opens with a block of header rows whose first cell starts
//! with `#`. The `#var` rows stack into a dotted field path per column,
//! `#type` rows tag every level of that path, and `#default` rows supply
//! fill-in values. Data rows below the header become records; a row that
//! only fills list-typed fields continues the record above it.
//!
//! This library provides tools for:
//! - Extracting a column schema from the header block
//! - Reading, normalizing and defaulting data rows into nested records
//! - Folding continuation rows into list fields
//! - Loading CSV and JSON workbooks and converting them in batches
//! - Querying parsed records by dotted path

pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod models;
pub mod parser;
pub mod path;
pub mod processor;
pub mod record;
pub mod value;
pub mod workbook;
pub mod worksheet;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{ParserConfig, ProcessorConfig};
pub use error::{Result, SheetError};
pub use models::{ProcessingStats, SheetResult, SheetSchema, WorkbookResult};
pub use parser::SheetParser;
pub use path::query;
pub use processor::WorkbookProcessor;
pub use value::{Record, Value};
pub use workbook::load_workbook;
pub use worksheet::{GridSheet, Worksheet};
