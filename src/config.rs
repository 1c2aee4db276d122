//! Configuration management and validation.
//!
//! Provides the parser settings consumed by schema extraction and row
//! parsing, plus the batch settings used when converting many workbooks.

use crate::constants::{
    DEFAULT_IDENTIFIER_PATTERN, DEFAULT_LIST_MARKER, DEFAULT_MAX_COLUMNS, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_ROWS, DEFAULT_VALID_TYPES, HEADER_MARKER,
};
use crate::error::{Result, SheetError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings that shape how a worksheet is interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Extra header keywords collected per column like `var`/`type`/`default`
    pub custom_keywords: Vec<String>,

    /// Match keywords, type tags and identifiers case-sensitively
    pub case_sensitive: bool,

    /// Rows beyond this limit are ignored with a warning
    pub max_rows: usize,

    /// Columns beyond this limit are ignored with a warning
    pub max_columns: usize,

    /// List merging is skipped below this path depth
    pub max_depth: usize,

    /// Validate identifiers and type tags, dropping offending columns
    pub strict: bool,

    /// Pattern every `var` segment must match in strict mode
    pub identifier_pattern: String,

    /// Type tags accepted in strict mode
    pub valid_types: Vec<String>,

    /// Substring of a type tag that marks a list field
    pub list_marker: String,

    /// Prefix of a header row's column-1 cell
    pub marker: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            custom_keywords: Vec::new(),
            case_sensitive: false,
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: DEFAULT_MAX_COLUMNS,
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
            identifier_pattern: DEFAULT_IDENTIFIER_PATTERN.to_string(),
            valid_types: DEFAULT_VALID_TYPES.iter().map(|t| t.to_string()).collect(),
            list_marker: DEFAULT_LIST_MARKER.to_string(),
            marker: HEADER_MARKER.to_string(),
        }
    }
}

impl ParserConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SheetError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let config: ParserConfig =
            serde_json::from_str(&text).map_err(|source| SheetError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        debug!("Loaded parser configuration from {}", path.display());
        Ok(config)
    }

    /// Reject settings the parser cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 || self.max_columns == 0 {
            return Err(SheetError::configuration(
                "max_rows and max_columns must be greater than zero",
            ));
        }
        if self.marker.is_empty() {
            return Err(SheetError::configuration("header marker must not be empty"));
        }
        if self.list_marker.is_empty() {
            return Err(SheetError::configuration("list marker must not be empty"));
        }
        self.identifier_regex()?;
        Ok(())
    }

    /// Compile the identifier pattern, honouring case sensitivity
    pub fn identifier_regex(&self) -> Result<Regex> {
        let pattern = if self.case_sensitive {
            self.identifier_pattern.clone()
        } else {
            format!("(?i){}", self.identifier_pattern)
        };
        Regex::new(&pattern).map_err(|e| {
            SheetError::configuration(format!(
                "invalid identifier pattern '{}': {}",
                self.identifier_pattern, e
            ))
        })
    }

    /// Fold text for comparison according to `case_sensitive`
    pub fn fold(&self, text: &str) -> String {
        if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }

    /// True when the type tag denotes a repeating field
    pub fn is_list_type(&self, type_tag: &str) -> bool {
        self.fold(type_tag).contains(&self.fold(&self.list_marker))
    }

    /// Register an additional header keyword
    pub fn with_custom_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.custom_keywords.push(keyword.into());
        self
    }

    /// Enable strict identifier and type validation
    pub fn with_strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Match keywords, types and identifiers case-sensitively
    pub fn with_case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Set the row and column limits
    pub fn with_limits(mut self, max_rows: usize, max_columns: usize) -> Self {
        self.max_rows = max_rows;
        self.max_columns = max_columns;
        self
    }

    /// Set the deepest path at which list merging is attempted
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the accepted type tags
    pub fn with_valid_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the identifier pattern
    pub fn with_identifier_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.identifier_pattern = pattern.into();
        self
    }
}

/// Batch conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Settings handed to every sheet parse
    pub parser: ParserConfig,

    /// Maximum workbooks parsed at the same time
    pub max_concurrent_files: usize,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Stop at the first workbook that fails to load
    pub fail_fast: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            max_concurrent_files: num_cpus::get().max(1),
            pretty: false,
            fail_fast: false,
        }
    }
}

impl ProcessorConfig {
    /// Use the given parser settings
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files.max(1);
        self
    }

    /// Pretty-print output JSON
    pub fn with_pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Abort on the first failing workbook
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }
}
