use crate::{
    label::{LabelError, RunLabel},
    record::BenchmarkRecord,
    table::{Row, Table},
};
use itertools::Itertools;
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("failed to open {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read record {row} of {path:?}")]
    Parse {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// Load and merge result files.
/// Rows keep the append order of the given paths; no total order is imposed.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Table, IngestError> {
    let mut rows = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let label = RunLabel::from_path(path)?;
        let file = File::open(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        read_records(&mut rows, &label, path, file)?;
    }

    let table = Table::from_rows(rows);

    info!(
        files = paths.len(),
        rows = table.len(),
        "loaded benchmark results"
    );
    info!("engine types: {}", table.engine_types().iter().join(", "));
    info!("query types: {}", table.query_types().iter().join(", "));

    Ok(table)
}

fn read_records<R: Read>(
    rows: &mut Vec<Row>,
    label: &RunLabel,
    path: &Path,
    reader: R,
) -> Result<(), IngestError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    for (index, result) in csv_reader.deserialize::<BenchmarkRecord>().enumerate() {
        let record = result.map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            row: index + 1,
            source,
        })?;

        rows.push(Row {
            label: label.clone(),
            record,
        });
    }

    Ok(())
}
