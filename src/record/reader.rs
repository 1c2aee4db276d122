//! Reads one physical worksheet row into a raw nested record.

use super::ParseContext;
use crate::error::{Result, SheetError};
use crate::path::build_path;
use crate::value::{Record, Value};
use crate::worksheet::Worksheet;

/// Read every schema-bearing column of `row` into a nested record.
///
/// Intermediate var segments create child records; the last segment holds
/// the cell value. Blank cells read as [`Value::Null`].
pub fn read_row<W: Worksheet + ?Sized>(
    sheet: &W,
    row: usize,
    ctx: &ParseContext<'_>,
) -> Result<Record> {
    let mut record = Record::new();

    for column in &ctx.schema.columns {
        let segments = column.var_path();
        if segments.is_empty() {
            return Err(SheetError::MissingVarPath {
                sheet: ctx.sheet.to_string(),
                row,
                column: column.column,
            });
        }

        let text = sheet
            .cell_text(row, column.column)
            .map_err(|e| SheetError::CellRead {
                sheet: ctx.sheet.to_string(),
                row,
                column: column.column,
                reason: e.to_string(),
            })?;
        let value = match text {
            Some(text) if !text.trim().is_empty() => Value::scalar(text),
            _ => Value::Null,
        };

        if !deposit(&mut record, segments, value) {
            return Err(SheetError::PathConflict {
                sheet: ctx.sheet.to_string(),
                row,
                column: column.column,
                path: build_path(segments),
            });
        }
    }

    Ok(record)
}

/// Place `value` at the nested location named by `segments`.
///
/// Returns false when a segment is already occupied by a value of the
/// other shape (a leaf where an object is needed, or the reverse).
fn deposit(record: &mut Record, segments: &[String], value: Value) -> bool {
    let Some((leaf, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = record;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Record(Record::new()));
        current = match slot {
            Value::Record(child) => child,
            _ => return false,
        };
    }

    if matches!(current.get(leaf), Some(Value::Record(_))) {
        return false;
    }
    current.insert(leaf.clone(), value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_deposit_builds_nested_records() {
        let mut record = Record::new();
        assert!(deposit(&mut record, &segments(&["Stats", "HP"]), Value::scalar("10")));
        assert!(deposit(&mut record, &segments(&["Stats", "MP"]), Value::Null));
        assert!(deposit(&mut record, &segments(&["Name"]), Value::scalar("Bob")));

        let stats = record.get("Stats").and_then(Value::as_record).unwrap();
        assert_eq!(stats.get("HP"), Some(&Value::scalar("10")));
        assert_eq!(stats.get("MP"), Some(&Value::Null));
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["Stats", "Name"]);
    }

    #[test]
    fn test_deposit_rejects_shape_conflicts() {
        let mut record = Record::new();
        assert!(deposit(&mut record, &segments(&["Stats"]), Value::scalar("x")));
        assert!(!deposit(&mut record, &segments(&["Stats", "HP"]), Value::Null));

        let mut record = Record::new();
        assert!(deposit(&mut record, &segments(&["Stats", "HP"]), Value::Null));
        assert!(!deposit(&mut record, &segments(&["Stats"]), Value::scalar("x")));
    }

    #[test]
    fn test_deposit_rejects_empty_path() {
        let mut record = Record::new();
        assert!(!deposit(&mut record, &[], Value::Null));
    }
}
