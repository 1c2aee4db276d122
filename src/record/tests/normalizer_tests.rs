//! Normalizer tests

use super::*;
use crate::error::SheetError;
use crate::record::{ParseContext, normalize, prune_empty, read_row};

#[test]
fn test_list_fields_are_wrapped() {
    let sheet = inventory_sheet(vec![vec!["", "1", "Sword", "sharp", "50"]]);
    let config = ParserConfig::default();
    let schema = schema_for(&sheet, &config);
    let ctx = ParseContext::new("Inventory", &schema, &config);

    let mut row = read_row(&sheet, 6, &ctx).unwrap();
    normalize(&mut row, &ctx, 6).unwrap();

    assert_eq!(
        row.get("Items"),
        Some(&list(vec![Value::Record(record(vec![
            ("Name", scalar("Sword")),
            ("Tags", list(vec![scalar("sharp")])),
        ]))]))
    );
    assert_eq!(row.get("Id"), Some(&scalar("1")));
}

#[test]
fn test_empty_subtrees_collapse_to_null() {
    let sheet = inventory_sheet(vec![vec!["", "1", "", "", ""]]);
    let config = ParserConfig::default();
    let schema = schema_for(&sheet, &config);
    let ctx = ParseContext::new("Inventory", &schema, &config);

    let mut row = read_row(&sheet, 6, &ctx).unwrap();
    normalize(&mut row, &ctx, 6).unwrap();

    assert_eq!(row.get("Items"), Some(&Value::Null));
    assert_eq!(row.get("Stats"), Some(&Value::Null));
}

#[test]
fn test_missing_type_is_a_data_error() {
    let sheet = inventory_sheet(vec![]);
    let config = ParserConfig::default();
    let schema = schema_for(&sheet, &config);
    let ctx = ParseContext::new("Inventory", &schema, &config);

    let mut row = record(vec![("Unknown", scalar("x"))]);
    match normalize(&mut row, &ctx, 12) {
        Err(SheetError::MissingType { path, row, .. }) => {
            assert_eq!(path, "Unknown");
            assert_eq!(row, 12);
        }
        other => panic!("Expected MissingType, got {:?}", other),
    }
}

#[test]
fn test_prune_drops_empty_records_and_null_items() {
    let mut row = record(vec![
        ("Name", scalar("Bob")),
        (
            "Items",
            list(vec![
                Value::Record(record(vec![("Name", Value::Null)])),
                Value::Record(record(vec![("Name", scalar("Axe"))])),
            ]),
        ),
        ("Stats", Value::Record(record(vec![("HP", Value::Null)]))),
    ]);

    prune_empty(&mut row);

    assert_eq!(
        row.get("Items"),
        Some(&list(vec![Value::Record(record(vec![(
            "Name",
            scalar("Axe")
        )]))]))
    );
    assert_eq!(row.get("Stats"), Some(&Value::Null));
    assert_eq!(row.get("Name"), Some(&scalar("Bob")));
}
