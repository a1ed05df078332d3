//! CSV ingest for benchmark result files.
//!
//! Result files are named `<engine>_<configuration>_results.csv`; the loader
//! derives a [`RunLabel`] from each filename, reads the rows, and merges
//! everything into a single [`Table`] in append order.

pub mod label;
pub mod loader;
pub mod record;
pub mod table;

pub use label::{LabelError, RunLabel};
pub use loader::{load_files, IngestError};
pub use record::BenchmarkRecord;
pub use table::{Row, Table};
