//! Error handling tests for batch conversion

use super::{INVENTORY_CSV, write_input};
use crate::config::{ParserConfig, ProcessorConfig};
use crate::error::SheetError;
use crate::processor::WorkbookProcessor;
use tempfile::TempDir;

#[tokio::test]
async fn test_bad_file_is_counted_and_others_continue() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_input(temp_dir.path(), "good.csv", INVENTORY_CSV);
    let bad = write_input(temp_dir.path(), "bad.json", "{ not json");

    let processor = WorkbookProcessor::new(vec![good, bad], None, ProcessorConfig::default())
        .unwrap()
        .quiet();

    let stats = processor.process().await.unwrap();
    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_failed, 1);
    assert!(temp_dir.path().join("good.records.json").exists());
    assert!(!temp_dir.path().join("bad.records.json").exists());
}

#[tokio::test]
async fn test_fail_fast_returns_the_error() {
    let temp_dir = TempDir::new().unwrap();
    let bad = write_input(temp_dir.path(), "bad.json", "{ not json");

    let config = ProcessorConfig::default().with_fail_fast();
    let processor = WorkbookProcessor::new(vec![bad], None, config)
        .unwrap()
        .quiet();

    let err = processor.process().await.unwrap_err();
    assert!(matches!(err, SheetError::Json { .. }));
}

#[tokio::test]
async fn test_unsupported_file_is_a_failure() {
    let temp_dir = TempDir::new().unwrap();
    let sheet = write_input(temp_dir.path(), "book.xlsx", "binary");

    let processor = WorkbookProcessor::new(vec![sheet], None, ProcessorConfig::default())
        .unwrap()
        .quiet();

    let stats = processor.process().await.unwrap();
    assert_eq!(stats.files_failed, 1);
    assert_eq!(stats.files_processed, 0);
}

#[test]
fn test_invalid_parser_config_is_rejected() {
    let config =
        ProcessorConfig::default().with_parser(ParserConfig::default().with_limits(0, 0));
    let result = WorkbookProcessor::new(Vec::new(), None, config);
    assert!(matches!(result, Err(SheetError::Configuration { .. })));
}

#[tokio::test]
async fn test_missing_input_aborts_discovery() {
    let processor = WorkbookProcessor::new(
        vec!["/no/such/workbook.csv".into()],
        None,
        ProcessorConfig::default(),
    )
    .unwrap()
    .quiet();

    let err = processor.process().await.unwrap_err();
    assert!(matches!(err, SheetError::FileNotFound { .. }));
}
