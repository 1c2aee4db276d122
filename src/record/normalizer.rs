//! Emptiness propagation and list wrapping.

use super::ParseContext;
use crate::error::{Result, SheetError};
use crate::path::join_path;
use crate::value::{Record, Value, record_is_empty};

/// Normalize a raw row record in place.
///
/// Child records whose fields are all empty collapse to [`Value::Null`],
/// bottom-up. Non-null values of list-typed fields are wrapped in a
/// single-element list. Every field path must have a declared type.
pub fn normalize(record: &mut Record, ctx: &ParseContext<'_>, row: usize) -> Result<()> {
    normalize_fields(record, "", ctx, row)
}

/// Normalize one list element belonging to the list field at `path`.
///
/// Record elements are normalized field by field and collapse to
/// [`Value::Null`] when empty. Scalars are left as they are.
pub fn normalize_item(
    item: &mut Value,
    path: &str,
    ctx: &ParseContext<'_>,
    row: usize,
) -> Result<()> {
    if let Value::Record(record) = item {
        normalize_fields(record, path, ctx, row)?;
        if record_is_empty(record) {
            *item = Value::Null;
        }
    }
    Ok(())
}

fn normalize_fields(
    record: &mut Record,
    prefix: &str,
    ctx: &ParseContext<'_>,
    row: usize,
) -> Result<()> {
    for (name, value) in record.iter_mut() {
        let path = join_path(prefix, name);
        let tag = ctx.type_of(&path).ok_or_else(|| SheetError::MissingType {
            sheet: ctx.sheet.to_string(),
            row,
            path: path.clone(),
        })?;

        if let Value::Record(child) = value {
            normalize_fields(child, &path, ctx, row)?;
            if record_is_empty(child) {
                *value = Value::Null;
            }
        }

        if ctx.config.is_list_type(tag) && !value.is_null() && !matches!(value, Value::List(_)) {
            let item = std::mem::take(value);
            *value = Value::List(vec![item]);
        }
    }
    Ok(())
}

/// Re-apply the emptiness rule to an already normalized record.
///
/// Used after a continuation row is merged: empty child records collapse to
/// null and null list elements are dropped. List wrapping is not repeated.
pub fn prune_empty(record: &mut Record) {
    for value in record.values_mut() {
        prune_value(value);
    }
}

fn prune_value(value: &mut Value) {
    match value {
        Value::Record(child) => {
            prune_empty(child);
            if record_is_empty(child) {
                *value = Value::Null;
            }
        }
        Value::List(items) => {
            for item in items.iter_mut() {
                prune_value(item);
            }
            items.retain(|item| !item.is_null());
        }
        Value::Null | Value::Scalar(_) => {}
    }
}
