//! Dotted field paths.
//!
//! A column's stacked `var` values become a path such as `Items.Name`; the
//! same string keys the type and default maps and addresses values in a
//! parsed tree.

use crate::constants::PATH_SEPARATOR;
use crate::value::Value;

/// Join var segments into a dotted path
pub fn build_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for segment in segments {
        if !path.is_empty() {
            path.push(PATH_SEPARATOR);
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Every prefix of the var segments, shallowest first
pub fn path_prefixes<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    (1..=segments.len())
        .map(|depth| build_path(&segments[..depth]))
        .collect()
}

/// Extend a path prefix by one field name
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{name}")
    }
}

/// Number of segments in a path; the root path has depth zero
pub fn path_depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split(PATH_SEPARATOR).count()
    }
}

/// Collect every value addressed by `path` below `root`.
///
/// Lists are descended transparently: the remaining path applies to each
/// element. A value reached with no path left is returned as-is, or its
/// elements when it is a list. Missing fields contribute nothing.
pub fn query<'a>(root: &'a Value, path: &str) -> Vec<&'a Value> {
    let segments: Vec<&str> = path
        .split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect();
    let mut found = Vec::new();
    collect(root, &segments, &mut found);
    found
}

fn collect<'a>(value: &'a Value, segments: &[&str], found: &mut Vec<&'a Value>) {
    let Some((head, rest)) = segments.split_first() else {
        match value {
            Value::List(items) => found.extend(items.iter()),
            other => found.push(other),
        }
        return;
    };

    match value {
        Value::List(items) => {
            for item in items {
                collect(item, segments, found);
            }
        }
        Value::Record(record) => {
            if let Some(child) = record.get(*head) {
                collect(child, rest, found);
            }
        }
        Value::Null | Value::Scalar(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    fn record(fields: Vec<(&str, Value)>) -> Value {
        Value::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<Record>(),
        )
    }

    #[test]
    fn test_build_path_and_prefixes() {
        assert_eq!(build_path(&["Items", "Name"]), "Items.Name");
        assert_eq!(build_path::<&str>(&[]), "");
        assert_eq!(
            path_prefixes(&["a", "b", "c"]),
            vec!["a".to_string(), "a.b".to_string(), "a.b.c".to_string()]
        );
    }

    #[test]
    fn test_join_and_depth() {
        assert_eq!(join_path("", "Items"), "Items");
        assert_eq!(join_path("Items", "Name"), "Items.Name");
        assert_eq!(path_depth(""), 0);
        assert_eq!(path_depth("Items.Name"), 2);
    }

    #[test]
    fn test_query_flattens_through_lists() {
        let root = record(vec![(
            "Items",
            Value::List(vec![
                record(vec![("Name", Value::scalar("Sword"))]),
                record(vec![("Name", Value::scalar("Shield"))]),
                record(vec![("Other", Value::scalar("x"))]),
            ]),
        )]);

        let names: Vec<&str> = query(&root, "Items.Name")
            .into_iter()
            .filter_map(Value::as_scalar)
            .collect();
        assert_eq!(names, vec!["Sword", "Shield"]);
    }

    #[test]
    fn test_query_terminal_list_is_flattened_one_level() {
        let root = record(vec![(
            "Tags",
            Value::List(vec![Value::scalar("a"), Value::scalar("b")]),
        )]);
        assert_eq!(query(&root, "Tags").len(), 2);
        assert!(query(&root, "Missing").is_empty());
        assert!(query(&root, "Tags.Deeper").is_empty());
    }

    #[test]
    fn test_query_empty_path_returns_root() {
        let root = record(vec![("a", Value::Null)]);
        assert_eq!(query(&root, ""), vec![&root]);
    }
}
