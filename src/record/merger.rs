//! Continuation-row merging for repeating (list-typed) fields.
//!
//! A worksheet row is flat, but one logical record may span several rows
//! when it carries list fields. A row whose only non-empty fields are
//! list-typed continues the previous record: its list items are appended
//! to (or merged into the last item of) the previous record's lists.

use super::ParseContext;
use super::defaults::apply_defaults;
use super::normalizer::normalize_item;
use crate::error::Result;
use crate::path::{join_path, path_depth};
use crate::value::{Record, Value, record_is_empty};
use tracing::debug;

/// Try to fold `candidate` into `previous`.
///
/// `candidate` is the normalized form of physical row `row` and `raw` the
/// same row as read, before normalization. Appended list items are built
/// from `raw` so they get defaults the same way a new record does.
///
/// Returns true when the row was absorbed, false when it must start a new
/// logical record. `previous` is left untouched when this returns false.
pub fn merge_continuation(
    previous: &mut Record,
    candidate: &Record,
    raw: &Record,
    ctx: &ParseContext<'_>,
    row: usize,
) -> Result<bool> {
    merge_at(previous, candidate, raw, "", ctx, row)
}

fn merge_at(
    previous: &mut Record,
    candidate: &Record,
    raw: &Record,
    prefix: &str,
    ctx: &ParseContext<'_>,
    row: usize,
) -> Result<bool> {
    if record_is_empty(previous) || record_is_empty(candidate) {
        return Ok(false);
    }
    if path_depth(prefix) > ctx.config.max_depth {
        debug!(
            "Sheet '{}': not merging below '{}', depth limit {} reached",
            ctx.sheet, prefix, ctx.config.max_depth
        );
        return Ok(false);
    }

    let mut targets = Vec::new();
    for (name, value) in candidate {
        let path = join_path(prefix, name);
        if ctx.is_list_path(&path) {
            targets.push((name, path, value));
        } else if !value.is_empty() {
            return Ok(false);
        }
    }

    let mut merged = 0;
    for (name, path, value) in targets {
        let Some(item) = first_item(value) else {
            continue;
        };
        let raw_item = raw.get(name).filter(|v| !v.is_null()).unwrap_or(item);
        let slot = previous.entry(name.clone()).or_insert(Value::Null);
        append_item(slot, item, raw_item, &path, ctx, row)?;
        merged += 1;
    }

    Ok(merged > 0)
}

/// The single item a continuation row contributes to a list field
fn first_item(value: &Value) -> Option<&Value> {
    match value {
        Value::List(items) => items.first().filter(|item| !item.is_empty()),
        _ => None,
    }
}

/// Merge `item` into the last element of the list in `slot`, or append it
fn append_item(
    slot: &mut Value,
    item: &Value,
    raw_item: &Value,
    path: &str,
    ctx: &ParseContext<'_>,
    row: usize,
) -> Result<()> {
    if let Value::List(items) = slot {
        if let (Some(Value::Record(last)), Value::Record(incoming), Value::Record(raw_incoming)) =
            (items.last_mut(), item, raw_item)
        {
            if merge_at(last, incoming, raw_incoming, path, ctx, row)? {
                return Ok(());
            }
        }
    }

    let fresh = new_item(raw_item, path, ctx, row)?;
    match slot {
        Value::List(items) => items.push(fresh),
        Value::Null => *slot = Value::List(vec![fresh]),
        other => {
            let existing = std::mem::take(other);
            *other = Value::List(vec![existing, fresh]);
        }
    }
    Ok(())
}

/// Build a list element from its raw cells: defaults first, then normalize
fn new_item(raw_item: &Value, path: &str, ctx: &ParseContext<'_>, row: usize) -> Result<Value> {
    let mut item = raw_item.clone();
    apply_defaults(&mut item, path, ctx);
    normalize_item(&mut item, path, ctx, row)?;
    Ok(item)
}
