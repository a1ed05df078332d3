mod charts;
mod config;
mod tables;

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, path::PathBuf, process::exit};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "benchviz",
    version,
    about = "Render comparison charts and tables from benchmark result CSVs"
)]
struct Args {
    /// result files, named <engine>_<configuration>_results.csv
    #[arg(required = true)]
    results: Vec<PathBuf>,

    /// report configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// override the configured output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if let Err(error) = run(&args) {
        error!("report generation failed: {error:#}");
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = config::load(args.config.as_deref())?;
    if let Some(output) = &args.output {
        config.output = output.clone();
    }

    let table = benchviz_ingest::load_files(&args.results)?;
    if table.is_empty() {
        warn!("the loaded files contain no rows, nothing to render");
        return Ok(());
    }

    let images = config.output.join("images");
    fs::create_dir_all(&images)
        .with_context(|| format!("failed to create {}", images.display()))?;

    let distribution = tables::query_distribution(&table);
    println!("{}\n", distribution.to_text());
    tables::write_html(&config.output, "query_distribution.html", &distribution)?;

    let summary = tables::summary_statistics(&table);
    println!("{}\n", summary.to_text());
    tables::write_html(&config.output, "summary_statistics.html", &summary)?;

    charts::distribution::render(&table, &images)?;
    charts::success::render(&table, &images)?;
    charts::comparison::render(&table, &images)?;
    charts::trends::render_query_time(&table, &images)?;
    charts::trends::render_memory(&table, &images, config.rolling_window)?;
    charts::impact::render_range_vs_equals(&table, &images)?;
    charts::impact::render_configuration_impact(&table, &images, &config.impact)?;

    info!("report written to {}", config.output.display());

    Ok(())
}
