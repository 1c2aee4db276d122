//! Fills empty leaves from the header `default` values.

use super::ParseContext;
use crate::path::join_path;
use crate::value::{Record, Value};

/// Apply defaults to a value located at `path`.
///
/// Records and the records inside lists are walked field by field; a leaf
/// at `path` itself takes the path's default when empty.
pub fn apply_defaults(value: &mut Value, path: &str, ctx: &ParseContext<'_>) {
    match value {
        Value::Record(record) => apply_record_defaults(record, path, ctx),
        Value::List(items) if ctx.default_of(path).is_none() => {
            for item in items.iter_mut() {
                if let Value::Record(record) = item {
                    apply_record_defaults(record, path, ctx);
                }
            }
        }
        _ => {
            if let Some(default) = ctx.default_of(path) {
                fill_leaf(value, default);
            }
        }
    }
}

/// Apply defaults to every field of a record whose fields live below `prefix`
pub fn apply_record_defaults(record: &mut Record, prefix: &str, ctx: &ParseContext<'_>) {
    for (name, value) in record.iter_mut() {
        let path = join_path(prefix, name);
        match ctx.default_of(&path) {
            Some(default) => fill_leaf(value, default),
            None => match value {
                Value::Record(child) => apply_record_defaults(child, &path, ctx),
                Value::List(items) => {
                    for item in items.iter_mut() {
                        if let Value::Record(child) = item {
                            apply_record_defaults(child, &path, ctx);
                        }
                    }
                }
                Value::Null | Value::Scalar(_) => {}
            },
        }
    }
}

/// Replace an empty leaf with the default; non-empty values are untouched
fn fill_leaf(value: &mut Value, default: &str) {
    match value {
        Value::Null => *value = Value::scalar(default),
        Value::Scalar(text) if text.is_empty() => *text = default.to_string(),
        Value::List(items) if items.len() == 1 => {
            if let Some(item) = items.first_mut() {
                if matches!(item, Value::Null) || item.as_scalar().is_some_and(str::is_empty) {
                    *item = Value::scalar(default);
                }
            }
        }
        _ => {}
    }
}
