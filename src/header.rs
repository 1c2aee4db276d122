//! Header block parsing and schema extraction.
//!
//! Scans the leading `#`-marked rows of a worksheet, collects per-column
//! keyword values, derives the path→type and path→default maps, and
//! captures unrecognized header keywords as sheet metadata.

use crate::config::ParserConfig;
use crate::constants::{MARKER_COLUMN, keywords};
use crate::error::{Result, SheetError};
use crate::models::{ColumnSchema, SheetSchema};
use crate::path::{build_path, path_prefixes};
use crate::worksheet::Worksheet;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Compiled header rules derived from a [`ParserConfig`]
#[derive(Debug, Clone)]
pub struct SchemaRules {
    config: ParserConfig,
    recognized: HashSet<String>,
    identifier: Regex,
    valid_types: HashSet<String>,
}

impl SchemaRules {
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        let identifier = config.identifier_regex()?;
        let recognized = keywords::BUILTIN
            .iter()
            .map(|k| k.to_string())
            .chain(config.custom_keywords.iter().map(|k| config.fold(k.trim())))
            .collect();
        let valid_types = config.valid_types.iter().map(|t| config.fold(t)).collect();

        Ok(Self {
            config,
            recognized,
            identifier,
            valid_types,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Folded keyword if it belongs to the recognized set
    fn recognize(&self, keyword: &str) -> Option<String> {
        let folded = self.config.fold(keyword);
        self.recognized.contains(&folded).then_some(folded)
    }

    /// Why a column cannot be used, if it cannot
    fn column_problem(&self, column: &ColumnSchema) -> Option<String> {
        let vars = column.var_path();
        let types = column.types();

        if vars.is_empty() {
            return Some("no var values".to_string());
        }
        if types.is_empty() {
            return Some("no type values".to_string());
        }
        if vars.len() != types.len() {
            return Some(format!(
                "{} var values but {} type values",
                vars.len(),
                types.len()
            ));
        }

        if self.config.strict {
            if let Some(bad) = vars.iter().find(|v| !self.identifier.is_match(v)) {
                return Some(format!("invalid identifier '{}'", bad));
            }
            if let Some(bad) = types
                .iter()
                .find(|t| !self.valid_types.contains(&self.config.fold(t)))
            {
                return Some(format!("unknown type '{}'", bad));
            }
        }

        None
    }
}

/// Extract the schema declared by a worksheet's header block
pub fn extract_schema<W: Worksheet + ?Sized>(sheet: &W, rules: &SchemaRules) -> Result<SheetSchema> {
    let config = rules.config();
    let name = sheet.name();

    let dims = sheet
        .dimensions()
        .ok_or_else(|| SheetError::MissingDimensions {
            sheet: name.to_string(),
        })?;

    let rows = if dims.rows > config.max_rows {
        warn!(
            "Sheet '{}': {} rows exceed the limit of {}, ignoring the rest",
            name, dims.rows, config.max_rows
        );
        config.max_rows
    } else {
        dims.rows
    };
    let columns = if dims.columns > config.max_columns {
        warn!(
            "Sheet '{}': {} columns exceed the limit of {}, ignoring the rest",
            name, dims.columns, config.max_columns
        );
        config.max_columns
    } else {
        dims.columns
    };

    let mut builder = SchemaBuilder::new(sheet, rules, columns);

    for row in 1..=rows {
        let Some(text) = builder.cell(row, MARKER_COLUMN)? else {
            break;
        };
        let Some(keyword) = text.trim_start().strip_prefix(config.marker.as_str()) else {
            break;
        };
        let keyword = keyword.trim().to_string();
        builder.header_row(row, &keyword)?;
    }

    builder.build(rows)
}

/// Accumulates header state while scanning one worksheet
struct SchemaBuilder<'a, W: Worksheet + ?Sized> {
    sheet: &'a W,
    rules: &'a SchemaRules,
    columns: usize,
    header_rows: usize,
    keyword_rows: Vec<(usize, String)>,
    schema: SheetSchema,
}

impl<'a, W: Worksheet + ?Sized> SchemaBuilder<'a, W> {
    fn new(sheet: &'a W, rules: &'a SchemaRules, columns: usize) -> Self {
        Self {
            sheet,
            rules,
            columns,
            header_rows: 0,
            keyword_rows: Vec::new(),
            schema: SheetSchema::default(),
        }
    }

    /// Non-empty, trimmed cell text
    fn cell(&self, row: usize, column: usize) -> Result<Option<&'a str>> {
        let sheet: &'a W = self.sheet;
        let text = sheet
            .cell_text(row, column)
            .map_err(|e| SheetError::CellRead {
                sheet: sheet.name().to_string(),
                row,
                column,
                reason: e.to_string(),
            })?;
        Ok(text.map(str::trim).filter(|t| !t.is_empty()))
    }

    fn header_row(&mut self, row: usize, keyword: &str) -> Result<()> {
        self.header_rows = row;

        if keyword.is_empty() {
            debug!(
                "Sheet '{}': header row {} has no keyword",
                self.sheet.name(),
                row
            );
            return Ok(());
        }

        if let Some(folded) = self.rules.recognize(keyword) {
            self.keyword_rows.push((row, folded));
            return Ok(());
        }

        if self.schema.metadata.contains_key(keyword) {
            return Ok(());
        }
        for column in (MARKER_COLUMN + 1)..=self.columns {
            if let Some(value) = self.cell(row, column)? {
                self.schema
                    .metadata
                    .insert(keyword.to_string(), value.to_string());
                break;
            }
        }
        Ok(())
    }

    fn build(mut self, rows: usize) -> Result<SheetSchema> {
        let sheet: &'a W = self.sheet;
        let name = sheet.name();

        if self.header_rows == 0 {
            return Err(SheetError::no_schema(name, "no header rows found"));
        }
        let has = |keyword: &str| self.keyword_rows.iter().any(|(_, k)| k == keyword);
        if !has(keywords::VAR) || !has(keywords::TYPE) {
            return Err(SheetError::no_schema(
                name,
                "header block needs at least one var row and one type row",
            ));
        }

        let mut leaf_paths = HashSet::new();
        for index in (MARKER_COLUMN + 1)..=self.columns {
            let mut column = ColumnSchema::new(index);
            for (row, keyword) in &self.keyword_rows {
                if let Some(value) = self.cell(*row, index)? {
                    column.push(keyword, value);
                }
            }
            if column.is_empty() {
                continue;
            }

            if let Some(problem) = self.rules.column_problem(&column) {
                warn!(
                    "Sheet '{}': dropping column {}: {}",
                    name, index, problem
                );
                continue;
            }

            let leaf = build_path(column.var_path());
            if !leaf_paths.insert(leaf.clone()) {
                warn!(
                    "Sheet '{}': column {} repeats field path '{}', later column wins",
                    name, index, leaf
                );
            }
            self.register(&column);
            self.schema.columns.push(column);
        }

        self.schema.header_rows = self.header_rows;
        self.schema.rows = rows;

        debug!(
            "Parsed header for sheet '{}': {} header rows, {} columns, {} typed paths, {} metadata keys",
            name,
            self.schema.header_rows,
            self.schema.columns.len(),
            self.schema.path_types.len(),
            self.schema.metadata.len()
        );

        Ok(self.schema)
    }

    /// Register every path prefix's type and the leaf default
    fn register(&mut self, column: &ColumnSchema) {
        let prefixes = path_prefixes(column.var_path());
        for (path, tag) in prefixes.iter().zip(column.types()) {
            if let Some(previous) = self.schema.path_types.insert(path.clone(), tag.clone()) {
                if previous != *tag {
                    warn!(
                        "Sheet '{}': path '{}' declared as '{}' and '{}', using '{}'",
                        self.sheet.name(),
                        path,
                        previous,
                        tag,
                        tag
                    );
                }
            }
        }
        if let (Some(leaf), Some(default)) = (prefixes.last(), &column.default_value) {
            self.schema
                .path_defaults
                .insert(leaf.clone(), default.clone());
        }
    }
}
