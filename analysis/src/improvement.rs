use crate::stats::Summary;
use benchviz_ingest::Table;
use itertools::Itertools;

/// per-query-type improvement of a variant configuration over a baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Improvement {
    pub query_type: String,
    pub percent: f64,
}

/// Improvement of `variant` over `baseline`, in percent of the baseline mean:
/// `(base - variant) / base * 100`.
///
/// Configurations match by substring, so `nocache` selects
/// `bplusarray_nocache` and `hashmap_nocache` alike. Query types with a zero
/// baseline mean are skipped, as are query types missing either side.
pub fn configuration_impact(table: &Table, baseline: &str, variant: &str) -> Vec<Improvement> {
    let mut improvements = Vec::new();

    for query_type in table.query_types() {
        let base = mean_matching(table, baseline, &query_type);
        let variant_mean = mean_matching(table, variant, &query_type);
        let (Some(base), Some(variant_mean)) = (base, variant_mean) else {
            continue;
        };

        if base == 0.0 {
            continue;
        }

        improvements.push(Improvement {
            query_type,
            percent: (base - variant_mean) / base * 100.0,
        });
    }

    improvements
}

fn mean_matching(table: &Table, pattern: &str, query_type: &str) -> Option<f64> {
    let values = table
        .rows()
        .iter()
        .filter(|row| {
            row.label.configuration.contains(pattern) && row.record.query_type == query_type
        })
        .map(|row| row.record.avg_execution_time)
        .collect_vec();

    Summary::of(&values).map(|summary| summary.mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchviz_ingest::{BenchmarkRecord, Row, RunLabel, Table};
    use chrono::NaiveDate;

    fn row(configuration: &str, query_type: &str, avg: f64) -> Row {
        Row {
            label: RunLabel {
                engine: "bplus".to_string(),
                configuration: configuration.to_string(),
            },
            record: BenchmarkRecord {
                timestamp: NaiveDate::from_ymd_opt(2024, 10, 27)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
                query_type: query_type.to_string(),
                query_count: 100,
                avg_execution_time: avg,
                total_execution_time: avg * 100.0,
                success_rate: 100.0,
                heap_memory_used: None,
                heap_memory_delta: None,
            },
        }
    }

    #[test]
    fn halving_the_time_is_fifty_percent() {
        let table = Table::from_rows(vec![
            row("nocache", "INSERT", 100.0),
            row("withcache", "INSERT", 50.0),
        ]);

        let improvements = configuration_impact(&table, "nocache", "withcache");

        assert_eq!(
            improvements,
            vec![Improvement {
                query_type: "INSERT".to_string(),
                percent: 50.0,
            }]
        );
    }

    #[test]
    fn zero_baseline_is_skipped() {
        let table = Table::from_rows(vec![
            row("nocache", "INSERT", 0.0),
            row("withcache", "INSERT", 50.0),
            row("nocache", "DELETE", 10.0),
            row("withcache", "DELETE", 12.0),
        ]);

        let improvements = configuration_impact(&table, "nocache", "withcache");

        assert_eq!(improvements.len(), 1);
        assert_eq!(improvements[0].query_type, "DELETE");
        assert!((improvements[0].percent - -20.0).abs() < 1e-12);
    }

    #[test]
    fn query_types_missing_one_side_are_skipped() {
        let table = Table::from_rows(vec![
            row("nocache", "INSERT", 10.0),
            row("withcache", "DELETE", 5.0),
        ]);

        assert!(configuration_impact(&table, "nocache", "withcache").is_empty());
    }

    #[test]
    fn baseline_matches_by_substring() {
        let table = Table::from_rows(vec![
            row("nocache_v2", "INSERT", 10.0),
            row("withcache_v2", "INSERT", 5.0),
        ]);

        let improvements = configuration_impact(&table, "nocache", "withcache");

        assert_eq!(improvements.len(), 1);
        assert_eq!(improvements[0].percent, 50.0);
    }
}
