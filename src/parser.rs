//! Sheet parsing orchestration.
//!
//! Runs schema extraction once per worksheet, then walks the data rows:
//! read and normalize each row, skip rows that carry nothing, fold
//! continuation rows into the previous logical record, and otherwise
//! append a fully defaulted new record.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::header::{SchemaRules, extract_schema};
use crate::models::{SheetFailure, SheetResult, SheetSchema, WorkbookResult};
use crate::record::{
    ParseContext, apply_record_defaults, merge_continuation, normalize, prune_empty, read_row,
};
use crate::value::{Record, record_is_empty};
use crate::worksheet::Worksheet;
use std::path::Path;
use tracing::{debug, warn};

/// Parses worksheets into logical records.
///
/// Holds only immutable, compiled configuration; every parse builds its own
/// [`ParseContext`], so one parser can be shared across threads.
#[derive(Debug, Clone)]
pub struct SheetParser {
    rules: SchemaRules,
}

impl SheetParser {
    /// Create a parser, validating the configuration
    pub fn new(config: ParserConfig) -> Result<Self> {
        Ok(Self {
            rules: SchemaRules::new(config)?,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        self.rules.config()
    }

    /// Extract the header schema of a worksheet without reading data rows
    pub fn extract_schema<W: Worksheet + ?Sized>(&self, sheet: &W) -> Result<SheetSchema> {
        extract_schema(sheet, &self.rules)
    }

    /// Parse one worksheet into its logical records
    pub fn parse_sheet<W: Worksheet + ?Sized>(&self, sheet: &W) -> Result<SheetResult> {
        let schema = self.extract_schema(sheet)?;
        let ctx = ParseContext::new(sheet.name(), &schema, self.config());

        let mut records: Vec<Record> = Vec::new();
        let mut skipped = 0usize;
        let mut merged = 0usize;

        for row in schema.data_start_row()..=schema.rows {
            let raw = read_row(sheet, row, &ctx)?;

            let mut candidate = raw.clone();
            normalize(&mut candidate, &ctx, row)?;
            if record_is_empty(&candidate) {
                skipped += 1;
                continue;
            }

            if let Some(previous) = records.last_mut() {
                if merge_continuation(previous, &candidate, &raw, &ctx, row)? {
                    prune_empty(previous);
                    merged += 1;
                    continue;
                }
            }

            // A new logical record gets defaults before list wrapping, so
            // defaults also reach fields inside all-blank nested objects.
            let mut standalone = raw;
            apply_record_defaults(&mut standalone, "", &ctx);
            normalize(&mut standalone, &ctx, row)?;
            records.push(standalone);
        }

        debug!(
            "Parsed sheet '{}': {} records ({} continuation rows merged, {} blank rows skipped)",
            sheet.name(),
            records.len(),
            merged,
            skipped
        );

        Ok(SheetResult {
            sheet: sheet.name().to_string(),
            path_types: schema.path_types,
            records,
            metadata: schema.metadata,
        })
    }

    /// Parse every worksheet of a workbook.
    ///
    /// A failing sheet is recorded and logged; the remaining sheets are
    /// still parsed.
    pub fn parse_workbook<W: Worksheet>(&self, path: &Path, sheets: &[W]) -> WorkbookResult {
        let mut result = WorkbookResult {
            path: path.to_path_buf(),
            ..WorkbookResult::default()
        };

        for sheet in sheets {
            match self.parse_sheet(sheet) {
                Ok(parsed) => result.sheets.push(parsed),
                Err(e) => {
                    warn!(
                        "Skipping sheet '{}' in {}: {}",
                        sheet.name(),
                        path.display(),
                        e
                    );
                    result.failures.push(SheetFailure {
                        sheet: sheet.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        result
    }
}
