use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    // images land under <output>/images, tables under <output>
    #[serde(default = "default_output")]
    pub output: PathBuf,

    // trailing window for the memory trend chart
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    #[serde(default)]
    pub impact: ImpactConfig,
}

/// configuration substrings compared by the configuration-impact chart
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ImpactConfig {
    #[serde(default = "default_baseline")]
    pub baseline: String,
    #[serde(default = "default_variant")]
    pub variant: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            rolling_window: default_rolling_window(),
            impact: ImpactConfig::default(),
        }
    }
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            variant: default_variant(),
        }
    }
}

/// load the report config, falling back to the defaults when no file is given
pub fn load(path: Option<&Path>) -> anyhow::Result<ReportConfig> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;

            serde_yaml::from_reader(file)
                .with_context(|| format!("failed to parse config {}", path.display()))
        }
        None => Ok(ReportConfig::default()),
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("results")
}

fn default_rolling_window() -> usize {
    50
}

fn default_baseline() -> String {
    "nocache".to_string()
}

fn default_variant() -> String {
    "withcache".to_string()
}
