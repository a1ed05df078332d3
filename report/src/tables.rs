use anyhow::{Context, Result};
use benchviz_analysis::group::{self, metric, QueryDistribution};
use benchviz_analysis::stats::Summary;
use benchviz_ingest::Table;
use itertools::Itertools;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// one rendered report table, written both as aligned text and as HTML
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn to_text(&self) -> String {
        let widths = (0..self.header.len())
            .map(|column| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(column))
                    .chain(std::iter::once(&self.header[column]))
                    .map(|cell| cell.len())
                    .max()
                    .unwrap_or(0)
            })
            .collect_vec();

        let mut lines = vec![self.title.clone()];
        lines.push(render_line(&self.header, &widths));
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .join("  "),
        );
        for row in &self.rows {
            lines.push(render_line(row, &widths));
        }

        lines.join("\n")
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        html.push_str(
            "<style>\n\
             table { border-collapse: collapse; font-family: sans-serif; }\n\
             th, td { border: 1px solid #999; padding: 4px 10px; text-align: right; }\n\
             th, td:first-child { text-align: left; }\n\
             th { background: #eee; }\n\
             </style>\n</head>\n<body>\n",
        );
        html.push_str(&format!("<h1>{}</h1>\n<table>\n<thead>\n<tr>", escape(&self.title)));
        for cell in &self.header {
            html.push_str(&format!("<th>{}</th>", escape(cell)));
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

        html
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .join("  ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// workload mix per engine: largest QueryCount per query type,
/// each cell annotated with its share of the engine's total
pub fn query_distribution(table: &Table) -> ReportTable {
    let distribution = QueryDistribution::of(table);
    let query_types = distribution.query_types();

    let mut header = vec!["Engine Configuration".to_string()];
    header.extend(query_types.iter().cloned());
    header.push("Total".to_string());

    let mut rows = Vec::new();
    for engine_type in distribution.engine_types() {
        let mut row = vec![engine_type.clone()];
        for query_type in &query_types {
            row.push(match distribution.count(&engine_type, query_type) {
                Some(count) => format!(
                    "{} ({:.1}%)",
                    format_count(count),
                    distribution.percentage(&engine_type, query_type).unwrap_or(0.0)
                ),
                None => "-".to_string(),
            });
        }
        row.push(format_count(distribution.row_total(&engine_type)));
        rows.push(row);
    }

    let grand_total = distribution.grand_total();
    let mut total_row = vec!["Total".to_string()];
    for query_type in &query_types {
        let column_total = distribution.column_total(query_type);
        total_row.push(if grand_total == 0 {
            format_count(column_total)
        } else {
            format!(
                "{} ({:.1}%)",
                format_count(column_total),
                column_total as f64 / grand_total as f64 * 100.0
            )
        });
    }
    total_row.push(format_count(grand_total));
    rows.push(total_row);

    ReportTable {
        title: "Query Distribution".to_string(),
        header,
        rows,
    }
}

/// per (engine type, query type) statistics: execution time spread,
/// mean success rate and mean heap usage
pub fn summary_statistics(table: &Table) -> ReportTable {
    let times = group::summaries(table, metric::avg_execution_time);
    let success = group::by_engine_and_query(table, metric::success_rate);
    let heap = group::by_engine_and_query(table, metric::heap_memory_used);

    let rows = times
        .iter()
        .map(|((engine_type, query_type), summary)| {
            let key = (engine_type.clone(), query_type.clone());
            let success_mean = success
                .get(&key)
                .and_then(|values| Summary::of(values))
                .map(|s| format!("{:.2}", s.mean))
                .unwrap_or_else(|| "-".to_string());
            let heap_mean = heap
                .get(&key)
                .and_then(|values| Summary::of(values))
                .map(|s| format!("{:.2}", s.mean / 1e6))
                .unwrap_or_else(|| "-".to_string());

            vec![
                engine_type.clone(),
                query_type.clone(),
                summary.count.to_string(),
                format!("{:.2}", summary.mean),
                format!("{:.2}", summary.std),
                format!("{:.2}", summary.min),
                format!("{:.2}", summary.max),
                success_mean,
                heap_mean,
            ]
        })
        .collect_vec();

    ReportTable {
        title: "Summary Statistics".to_string(),
        header: [
            "Engine Configuration",
            "Query Type",
            "Samples",
            "Mean Time (ms)",
            "Std",
            "Min",
            "Max",
            "Success Rate (%)",
            "Heap Used (MB)",
        ]
        .map(str::to_string)
        .to_vec(),
        rows,
    }
}

pub fn write_html(output: &Path, file: &str, table: &ReportTable) -> Result<PathBuf> {
    let path = output.join(file);
    fs::write(&path, table.to_html())
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("generated {}", path.display());

    Ok(path)
}

fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchviz_ingest::{BenchmarkRecord, Row, RunLabel, Table};
    use chrono::NaiveDate;

    fn row(engine_type: &str, query_type: &str, count: u64, avg: f64, heap: Option<f64>) -> Row {
        let (engine, configuration) = engine_type.split_once('_').unwrap();

        Row {
            label: RunLabel {
                engine: engine.to_string(),
                configuration: configuration.to_string(),
            },
            record: BenchmarkRecord {
                timestamp: NaiveDate::from_ymd_opt(2024, 10, 27)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
                query_type: query_type.to_string(),
                query_count: count,
                avg_execution_time: avg,
                total_execution_time: avg * count as f64,
                success_rate: 99.5,
                heap_memory_used: heap,
                heap_memory_delta: None,
            },
        }
    }

    fn fixture() -> Table {
        Table::from_rows(vec![
            row("bplus_nocache", "INSERT", 1500, 2.0, Some(2_000_000.0)),
            row("bplus_nocache", "RANGE_SELECT", 500, 8.0, Some(4_000_000.0)),
            row("hash_default", "INSERT", 1000, 1.0, None),
        ])
    }

    #[test]
    fn distribution_has_a_row_per_engine_plus_total() {
        let table = query_distribution(&fixture());

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "bplus_nocache");
        assert_eq!(table.rows[2][0], "Total");
        // 1500 of 2000 is 75%
        assert_eq!(table.rows[0][1], "1,500 (75.0%)");
        // hash_default never ran RANGE_SELECT
        assert_eq!(table.rows[1][2], "-");
        assert_eq!(table.rows[2][3], "3,000");
    }

    #[test]
    fn summary_rows_cover_each_pair() {
        let table = summary_statistics(&fixture());

        assert_eq!(table.rows.len(), 3);
        let insert = table
            .rows
            .iter()
            .find(|row| row[0] == "bplus_nocache" && row[1] == "INSERT")
            .unwrap();

        assert_eq!(insert[2], "1");
        assert_eq!(insert[3], "2.00");
        assert_eq!(insert[7], "99.50");
        assert_eq!(insert[8], "2.00");
    }

    #[test]
    fn missing_heap_data_renders_as_dash() {
        let table = summary_statistics(&fixture());
        let hash = table.rows.iter().find(|row| row[0] == "hash_default").unwrap();

        assert_eq!(hash[8], "-");
    }

    #[test]
    fn text_rendition_aligns_columns() {
        let text = query_distribution(&fixture()).to_text();
        let lines = text.lines().collect::<Vec<_>>();

        // title, header, separator, three data rows
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("Engine Configuration"));
    }

    #[test]
    fn html_rendition_contains_table_markup() {
        let html = summary_statistics(&fixture()).to_html();

        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Engine Configuration</th>"));
        assert_eq!(html.matches("<tr>").count(), 4);
    }

    #[test]
    fn html_output_lands_in_the_output_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_html(dir.path(), "summary_statistics.html", &summary_statistics(&fixture()))
            .unwrap();

        assert!(path.exists());
        assert!(fs::read_to_string(path).unwrap().contains("Summary Statistics"));
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
