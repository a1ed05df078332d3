use benchviz_ingest::{load_files, IngestError};
use std::{fs, path::PathBuf};
use tempfile::TempDir;

const FULL_HEADER: &str = "Timestamp,QueryType,QueryCount,AverageExecutionTime,TotalExecutionTime,SuccessRate,HeapMemoryUsed,HeapMemoryDelta";
const SQL_HEADER: &str =
    "Timestamp,QueryType,QueryCount,AverageExecutionTime,TotalExecutionTime,SuccessRate";

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();

    path
}

#[test]
fn merges_files_under_one_engine() {
    let dir = TempDir::new().unwrap();
    let first = write_file(
        &dir,
        "a_x_results.csv",
        &format!(
            "{FULL_HEADER}\n\
             2024-10-27T12:00:00,INSERT,100,0.5,50.0,100.0,1000,10\n\
             2024-10-27T12:00:01,RANGE_SELECT,100,1.5,150.0,99.0,2000,20\n"
        ),
    );
    let second = write_file(
        &dir,
        "a_y_results.csv",
        &format!("{FULL_HEADER}\n2024-10-27T12:01:00,INSERT,100,0.7,70.0,100.0,1500,15\n"),
    );

    let table = load_files(&[first, second]).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.engines(), vec!["a"]);
    assert_eq!(table.configurations(), vec!["x", "y"]);
    assert_eq!(table.engine_types(), vec!["a_x", "a_y"]);
    assert_eq!(table.query_types(), vec!["INSERT", "RANGE_SELECT"]);
    assert!(table.has_heap_data());
}

#[test]
fn keeps_append_order_across_files() {
    let dir = TempDir::new().unwrap();
    let first = write_file(
        &dir,
        "b_x_results.csv",
        &format!("{SQL_HEADER}\n2024-10-27T12:00:00,UPDATE,10,2.0,20.0,90.0\n"),
    );
    let second = write_file(
        &dir,
        "a_x_results.csv",
        &format!("{SQL_HEADER}\n2024-10-27T12:00:00,UPDATE,10,1.0,10.0,95.0\n"),
    );

    let table = load_files(&[first, second]).unwrap();

    assert_eq!(table.rows()[0].label.engine, "b");
    assert_eq!(table.rows()[1].label.engine, "a");
}

#[test]
fn rejects_filename_without_configuration() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "benchmark.csv",
        &format!("{SQL_HEADER}\n2024-10-27T12:00:00,INSERT,1,1.0,1.0,100.0\n"),
    );

    let error = load_files(&[path]).unwrap_err();

    assert!(matches!(error, IngestError::Label(_)));
    assert!(error.to_string().contains("benchmark.csv"));
}

#[test]
fn loads_harness_files_without_heap_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "hashmap_default_results.csv",
        &format!("{SQL_HEADER}\n2024-10-27T12:00:00,DELETE,50,0.3,15.0,100.0\n"),
    );

    let table = load_files(&[path]).unwrap();

    assert!(!table.has_heap_data());
    assert_eq!(table.rows()[0].record.heap_memory_used, None);
}

#[test]
fn reports_malformed_rows_with_position() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "a_x_results.csv",
        &format!("{SQL_HEADER}\n2024-10-27T12:00:00,INSERT,not-a-number,1.0,1.0,100.0\n"),
    );

    let error = load_files(&[path]).unwrap_err();

    assert!(matches!(error, IngestError::Parse { row: 1, .. }));
}
