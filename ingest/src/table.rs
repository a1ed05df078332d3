use crate::{label::RunLabel, record::BenchmarkRecord};
use itertools::Itertools;

/// one merged row: a CSV record plus the run label of its source file
#[derive(Debug, Clone)]
pub struct Row {
    pub label: RunLabel,
    pub record: BenchmarkRecord,
}

/// merged view over every loaded result file, rows kept in append order
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// sorted unique engine names
    pub fn engines(&self) -> Vec<String> {
        self.sorted_unique(|row| row.label.engine.clone())
    }

    /// sorted unique configuration names
    pub fn configurations(&self) -> Vec<String> {
        self.sorted_unique(|row| row.label.configuration.clone())
    }

    /// sorted unique `<engine>_<configuration>` labels
    pub fn engine_types(&self) -> Vec<String> {
        self.sorted_unique(|row| row.label.engine_type())
    }

    /// sorted unique query type categories
    pub fn query_types(&self) -> Vec<String> {
        self.sorted_unique(|row| row.record.query_type.clone())
    }

    /// true when at least one row carries the heap columns
    pub fn has_heap_data(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.record.heap_memory_delta.is_some() || row.record.heap_memory_used.is_some())
    }

    fn sorted_unique(&self, key: impl Fn(&Row) -> String) -> Vec<String> {
        self.rows.iter().map(key).unique().sorted().collect_vec()
    }
}
