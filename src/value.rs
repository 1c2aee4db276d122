//! Tagged value model for parsed worksheet data.
//!
//! Every stage of the pipeline reads and rewrites [`Value`] trees. Records
//! keep field insertion order so output is reproducible; list order is
//! worksheet row order.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Ordered mapping from field name to value
pub type Record = IndexMap<String, Value>;

/// A parsed cell, nested object or repeating group
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Scalar(String),
    Record(Record),
    List(Vec<Value>),
}

impl Value {
    /// Build a scalar from anything string-like
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Emptiness as seen by the normalizer and the list merger.
    ///
    /// Null, an empty list and an empty-text scalar are empty. A record is
    /// empty when every field is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Scalar(text) => text.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Record(record) => record_is_empty(record),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Field lookup on a record value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_record().and_then(|record| record.get(name))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Scalar(text)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// True when every field of the record is empty (an empty record included)
pub fn record_is_empty(record: &Record) -> bool {
    record.values().all(Value::is_empty)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Scalar(text) => serializer.serialize_str(text),
            Value::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (name, value) in record {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emptiness_rules() {
        assert!(Value::Null.is_empty());
        assert!(Value::scalar("").is_empty());
        assert!(Value::List(Vec::new()).is_empty());
        assert!(!Value::scalar("0").is_empty());
        assert!(!Value::List(vec![Value::Null]).is_empty());

        let mut record = Record::new();
        record.insert("a".to_string(), Value::Null);
        record.insert("b".to_string(), Value::scalar(""));
        assert!(Value::Record(record.clone()).is_empty());

        record.insert("c".to_string(), Value::scalar("x"));
        assert!(!Value::Record(record).is_empty());
    }

    #[test]
    fn test_json_keeps_field_order() {
        let mut inner = Record::new();
        inner.insert("zeta".to_string(), Value::scalar("1"));
        inner.insert("alpha".to_string(), Value::Null);

        let mut record = Record::new();
        record.insert("Name".to_string(), Value::scalar("Alice"));
        record.insert("Tags".to_string(), Value::List(vec![Value::scalar("a")]));
        record.insert("Inner".to_string(), Value::Record(inner));

        let json = serde_json::to_string(&Value::Record(record)).unwrap();
        assert_eq!(
            json,
            r#"{"Name":"Alice","Tags":["a"],"Inner":{"zeta":"1","alpha":null}}"#
        );
    }
}
