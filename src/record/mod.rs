//! Row-to-record pipeline stages.
//!
//! Each physical data row is read into a raw [`Record`](crate::value::Record),
//! normalized, and then either folded into the previous logical record as a
//! continuation row or defaulted and appended as a new one.
//!
//! - [`reader`] - Deposits cell values at their field paths
//! - [`normalizer`] - Prunes empty subtrees and wraps list-typed fields
//! - [`merger`] - Folds continuation rows into repeating fields
//! - [`defaults`] - Fills empty leaves from the header defaults

pub mod defaults;
pub mod merger;
pub mod normalizer;
pub mod reader;

#[cfg(test)]
pub mod tests;

pub use defaults::{apply_defaults, apply_record_defaults};
pub use merger::merge_continuation;
pub use normalizer::{normalize, normalize_item, prune_empty};
pub use reader::read_row;

use crate::config::ParserConfig;
use crate::models::SheetSchema;

/// Per-sheet state threaded through every pipeline stage.
///
/// Built fresh for each worksheet and dropped afterwards, so nothing leaks
/// between sheets or between concurrent parses.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub sheet: &'a str,
    pub schema: &'a SheetSchema,
    pub config: &'a ParserConfig,
}

impl<'a> ParseContext<'a> {
    pub fn new(sheet: &'a str, schema: &'a SheetSchema, config: &'a ParserConfig) -> Self {
        Self {
            sheet,
            schema,
            config,
        }
    }

    /// Declared type tag of a field path
    pub fn type_of(&self, path: &str) -> Option<&'a str> {
        self.schema.path_types.get(path).map(String::as_str)
    }

    /// True when the path is declared with a list type
    pub fn is_list_path(&self, path: &str) -> bool {
        self.type_of(path)
            .is_some_and(|tag| self.config.is_list_type(tag))
    }

    /// Header default of a field path
    pub fn default_of(&self, path: &str) -> Option<&'a str> {
        self.schema.path_defaults.get(path).map(String::as_str)
    }
}
