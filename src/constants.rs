//! Application constants for the sheet records compiler
//!
//! Header syntax, built-in keywords, default limits and the reserved keys
//! of the per-sheet output mapping.

// =============================================================================
// Header Syntax
// =============================================================================

/// Prefix marking a column-1 cell as a header row
pub const HEADER_MARKER: &str = "#";

/// Column reserved for header markers (1-based)
pub const MARKER_COLUMN: usize = 1;

/// Separator between field path segments
pub const PATH_SEPARATOR: char = '.';

/// Built-in header keywords
pub mod keywords {
    /// Field name segment, one row per nesting level
    pub const VAR: &str = "var";

    /// Type tag aligned with the `var` row at the same position
    pub const TYPE: &str = "type";

    /// Literal fallback for the deepest field of a column
    pub const DEFAULT: &str = "default";

    /// All built-in keywords
    pub const BUILTIN: &[&str] = &[VAR, TYPE, DEFAULT];
}

// =============================================================================
// Types and Validation
// =============================================================================

/// Substring of a type tag that marks a repeating (list) field
pub const DEFAULT_LIST_MARKER: &str = "list";

/// Identifier pattern applied to `var` segments in strict mode
pub const DEFAULT_IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Type tags accepted in strict mode
pub const DEFAULT_VALID_TYPES: &[&str] = &["string", "int", "float", "bool", "list"];

// =============================================================================
// Limits
// =============================================================================

/// Rows read per worksheet before the rest is ignored
pub const DEFAULT_MAX_ROWS: usize = 65_536;

/// Columns read per worksheet before the rest is ignored
pub const DEFAULT_MAX_COLUMNS: usize = 1_024;

/// Deepest path at which list merging is attempted
pub const DEFAULT_MAX_DEPTH: usize = 16;

// =============================================================================
// Output
// =============================================================================

/// Reserved keys of a sheet's output mapping
pub mod output_keys {
    pub const SHEET: &str = "sheet";
    pub const TYPES: &str = "types";
    pub const RECORDS: &str = "records";

    pub const RESERVED: &[&str] = &[SHEET, TYPES, RECORDS];
}

/// Suffix appended to the input file stem for converted output
pub const OUTPUT_SUFFIX: &str = "records.json";

/// Workbook file extensions understood by the bundled loaders
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "json"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keywords_are_lowercase() {
        for keyword in keywords::BUILTIN {
            assert_eq!(*keyword, keyword.to_lowercase());
        }
    }

    #[test]
    fn test_default_types_include_list_marker() {
        assert!(
            DEFAULT_VALID_TYPES
                .iter()
                .any(|t| t.contains(DEFAULT_LIST_MARKER))
        );
    }
}
