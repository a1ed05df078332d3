use crate::stats::Summary;
use benchviz_ingest::{Row, Table};
use itertools::Itertools;
use std::collections::BTreeMap;

/// metric accessor used by the grouped views; `None` drops the row from the group
pub type Metric = fn(&Row) -> Option<f64>;

/// accessors for the metric columns of a benchmark record
pub mod metric {
    use benchviz_ingest::Row;

    pub fn avg_execution_time(row: &Row) -> Option<f64> {
        Some(row.record.avg_execution_time)
    }

    pub fn total_execution_time(row: &Row) -> Option<f64> {
        Some(row.record.total_execution_time)
    }

    pub fn success_rate(row: &Row) -> Option<f64> {
        Some(row.record.success_rate)
    }

    pub fn heap_memory_used(row: &Row) -> Option<f64> {
        row.record.heap_memory_used
    }

    pub fn heap_memory_delta(row: &Row) -> Option<f64> {
        row.record.heap_memory_delta
    }
}

/// metric values grouped by engine type
pub fn by_engine_type(table: &Table, metric: Metric) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for row in table.rows() {
        if let Some(value) = metric(row) {
            groups.entry(row.label.engine_type()).or_default().push(value);
        }
    }

    groups
}

/// metric values grouped by (engine type, query type)
pub fn by_engine_and_query(table: &Table, metric: Metric) -> BTreeMap<(String, String), Vec<f64>> {
    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();

    for row in table.rows() {
        if let Some(value) = metric(row) {
            groups
                .entry((row.label.engine_type(), row.record.query_type.clone()))
                .or_default()
                .push(value);
        }
    }

    groups
}

/// per-group summary statistics over a metric
pub fn summaries(table: &Table, metric: Metric) -> BTreeMap<(String, String), Summary> {
    by_engine_and_query(table, metric)
        .into_iter()
        .filter_map(|(key, values)| Summary::of(&values).map(|summary| (key, summary)))
        .collect()
}

/// mean pivot: engine type -> query type -> mean metric value
pub fn mean_pivot(table: &Table, metric: Metric) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut pivot: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();

    for ((engine_type, query_type), values) in by_engine_and_query(table, metric) {
        if let Some(summary) = Summary::of(&values) {
            pivot.entry(engine_type).or_default().insert(query_type, summary.mean);
        }
    }

    pivot
}

/// mean metric value per engine type
pub fn mean_by_engine_type(table: &Table, metric: Metric) -> BTreeMap<String, f64> {
    by_engine_type(table, metric)
        .into_iter()
        .filter_map(|(engine_type, values)| {
            Summary::of(&values).map(|summary| (engine_type, summary.mean))
        })
        .collect()
}

/// summed metric value per engine type
pub fn sum_by_engine_type(table: &Table, metric: Metric) -> BTreeMap<String, f64> {
    by_engine_type(table, metric)
        .into_iter()
        .map(|(engine_type, values)| (engine_type, values.iter().sum()))
        .collect()
}

/// largest observed QueryCount per query type, across all engines
pub fn max_count_by_query(table: &Table) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for row in table.rows() {
        let entry = counts.entry(row.record.query_type.clone()).or_default();
        *entry = (*entry).max(row.record.query_count);
    }

    counts
}

/// per-engine (QueryCount, metric) series for one query type, sorted by QueryCount
pub fn series_by_engine(
    table: &Table,
    query_type: &str,
    metric: Metric,
) -> BTreeMap<String, Vec<(f64, f64)>> {
    let mut series: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();

    for row in table.rows() {
        if row.record.query_type != query_type {
            continue;
        }

        if let Some(value) = metric(row) {
            series
                .entry(row.label.engine_type())
                .or_default()
                .push((row.record.query_count as f64, value));
        }
    }

    for points in series.values_mut() {
        points.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    }

    series
}

/// query distribution: largest QueryCount per (engine type, query type),
/// the per-engine workload mix of the benchmark run
#[derive(Debug, Clone)]
pub struct QueryDistribution {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
}

impl QueryDistribution {
    pub fn of(table: &Table) -> Self {
        let mut counts: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();

        for row in table.rows() {
            let entry = counts
                .entry(row.label.engine_type())
                .or_default()
                .entry(row.record.query_type.clone())
                .or_default();
            *entry = (*entry).max(row.record.query_count);
        }

        Self { counts }
    }

    /// sorted engine types with at least one row
    pub fn engine_types(&self) -> Vec<String> {
        self.counts.keys().cloned().collect_vec()
    }

    /// sorted query types observed anywhere
    pub fn query_types(&self) -> Vec<String> {
        self.counts
            .values()
            .flat_map(|row| row.keys().cloned())
            .unique()
            .sorted()
            .collect_vec()
    }

    pub fn count(&self, engine_type: &str, query_type: &str) -> Option<u64> {
        self.counts.get(engine_type)?.get(query_type).copied()
    }

    pub fn row_total(&self, engine_type: &str) -> u64 {
        self.counts
            .get(engine_type)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    pub fn column_total(&self, query_type: &str) -> u64 {
        self.counts
            .values()
            .filter_map(|row| row.get(query_type))
            .sum()
    }

    pub fn grand_total(&self) -> u64 {
        self.counts.values().flat_map(|row| row.values()).sum()
    }

    /// share of the engine's own total, in percent
    pub fn percentage(&self, engine_type: &str, query_type: &str) -> Option<f64> {
        let total = self.row_total(engine_type);

        if total == 0 {
            return None;
        }

        Some(self.count(engine_type, query_type)? as f64 / total as f64 * 100.0)
    }
}
