use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};

/// one row of a benchmark result CSV, immutable once read
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkRecord {
    #[serde(rename = "Timestamp", deserialize_with = "parse_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "QueryType")]
    pub query_type: String,
    #[serde(rename = "QueryCount")]
    pub query_count: u64,
    #[serde(rename = "AverageExecutionTime")]
    pub avg_execution_time: f64,
    #[serde(rename = "TotalExecutionTime")]
    pub total_execution_time: f64,
    #[serde(rename = "SuccessRate")]
    pub success_rate: f64,
    // the SQL harness emits files without the heap columns
    #[serde(rename = "HeapMemoryUsed", default)]
    pub heap_memory_used: Option<f64>,
    #[serde(rename = "HeapMemoryDelta", default)]
    pub heap_memory_delta: Option<f64>,
}

// the harness writes ISO_LOCAL_DATE_TIME, older runs used a space separator
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .ok_or_else(|| de::Error::custom(format!("unparsable timestamp '{raw}'")))
}
