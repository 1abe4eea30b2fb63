//! Integration tests for dataset loading and the summary formatter,
//! driven through real files in a temporary directory.

use std::fs;
use std::path::Path;

use fraudlens::dataset::summary::format_summary;
use fraudlens::dataset::{self, ColumnType, LoadError};

const FRAUD_CSV: &str = "\
amount,is_fraud
12.5,false
80.0,false
3.99,false
250.0,true
7.25,false
";

fn write_csv(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn loads_csv_with_inferred_types() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "fraud.csv", FRAUD_CSV);

    let dataset = dataset::load_dir(dir.path()).unwrap();
    assert_eq!(dataset.row_count(), 5);
    assert_eq!(dataset.column_count(), 2);
    assert_eq!(dataset.columns[0].name, "amount");
    assert_eq!(dataset.columns[0].dtype, ColumnType::Float);
    assert_eq!(dataset.columns[1].name, "is_fraud");
    assert_eq!(dataset.columns[1].dtype, ColumnType::Bool);
}

#[test]
fn picks_the_first_csv_in_lexicographic_order() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "b_other.csv", "x\n1\n");
    write_csv(dir.path(), "a_fraud.csv", FRAUD_CSV);
    write_csv(dir.path(), "notes.txt", "not a dataset");

    let dataset = dataset::load_dir(dir.path()).unwrap();
    assert!(dataset.source.ends_with("a_fraud.csv"));
}

#[test]
fn missing_directory_is_a_load_error() {
    let err = dataset::load_dir(Path::new("/nonexistent/fraud-data")).unwrap_err();
    assert!(matches!(err, LoadError::MissingDir(_)));
}

#[test]
fn directory_without_csv_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "notes.txt", "nothing here");

    let err = dataset::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::NoCsvFile(_)));
}

#[test]
fn header_only_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "fraud.csv", "amount,is_fraud\n");

    let err = dataset::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Empty));
}

#[test]
fn ragged_rows_are_malformed() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "fraud.csv", "amount,is_fraud\n12.5,false,extra\n");

    let err = dataset::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Malformed { .. }));
}

// ---------------------------------------------------------------------------
// Summary formatting (file-driven)
// ---------------------------------------------------------------------------

#[test]
fn summary_begins_with_the_shape_figures() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "fraud.csv", FRAUD_CSV);

    let dataset = dataset::load_dir(dir.path()).unwrap();
    let summary = format_summary(&dataset);

    assert!(summary.starts_with("Number of rows: 5\nNumber of columns: 2\n"));
    assert!(summary.contains("amount: float (5 non-null)"));
    assert!(summary.contains("is_fraud: bool (5 non-null)"));
    assert!(summary.contains("Sample data (first 5 rows):"));
}

#[test]
fn summary_is_byte_identical_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "fraud.csv", FRAUD_CSV);

    let first = format_summary(&dataset::load_dir(dir.path()).unwrap());
    let second = format_summary(&dataset::load_dir(dir.path()).unwrap());
    assert_eq!(first, second);
}

#[test]
fn summary_statistics_reflect_the_numeric_column() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "fraud.csv", FRAUD_CSV);

    let dataset = dataset::load_dir(dir.path()).unwrap();
    let summary = format_summary(&dataset);

    // mean of [12.5, 80.0, 3.99, 250.0, 7.25] = 70.748
    assert!(summary.contains("70.7480"));
    // min and max, at the fixed stat precision
    assert!(summary.contains("3.9900"));
    assert!(summary.contains("250.0000"));
}
