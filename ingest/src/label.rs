use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("invalid result filename {path:?}, expected <engine>_<configuration>_results.csv")]
    InvalidFilename { path: PathBuf },
}

/// engine/configuration label derived from a result filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLabel {
    pub engine: String,
    pub configuration: String,
}

impl RunLabel {
    /// Parse `<engine>_<configuration>_results.csv`.
    /// The configuration may itself contain underscores; everything after the
    /// first token belongs to it.
    pub fn from_path(path: &Path) -> Result<Self, LabelError> {
        let invalid = || LabelError::InvalidFilename {
            path: path.to_path_buf(),
        };

        let name = path.file_name().and_then(OsStr::to_str).ok_or_else(invalid)?;
        let stem = name
            .strip_suffix("_results.csv")
            .or_else(|| name.strip_suffix(".csv"))
            .unwrap_or(name);

        match stem.split_once('_') {
            Some((engine, configuration)) if !engine.is_empty() && !configuration.is_empty() => {
                Ok(Self {
                    engine: engine.to_string(),
                    configuration: configuration.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }

    /// combined `<engine>_<configuration>` label used as the grouping key
    pub fn engine_type(&self) -> String {
        format!("{}_{}", self.engine, self.configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_engine_and_configuration() {
        let label = RunLabel::from_path(Path::new("results/bplusarray_nocache_results.csv")).unwrap();

        assert_eq!(label.engine, "bplusarray");
        assert_eq!(label.configuration, "nocache");
        assert_eq!(label.engine_type(), "bplusarray_nocache");
    }

    #[test]
    fn configuration_keeps_inner_underscores() {
        let label = RunLabel::from_path(Path::new("skiphash_no_cache_v2_results.csv")).unwrap();

        assert_eq!(label.engine, "skiphash");
        assert_eq!(label.configuration, "no_cache_v2");
        assert_eq!(label.engine_type(), "skiphash_no_cache_v2");
    }

    #[test]
    fn accepts_plain_csv_extension() {
        let label = RunLabel::from_path(Path::new("hashmap_default.csv")).unwrap();

        assert_eq!(label.engine, "hashmap");
        assert_eq!(label.configuration, "default");
    }

    #[test]
    fn rejects_filename_without_configuration() {
        let error = RunLabel::from_path(Path::new("benchmark.csv")).unwrap_err();

        assert!(matches!(error, LabelError::InvalidFilename { .. }));
        assert!(error.to_string().contains("benchmark.csv"));
    }

    #[test]
    fn rejects_bare_results_file() {
        assert!(RunLabel::from_path(Path::new("a_results.csv")).is_err());
    }
}
