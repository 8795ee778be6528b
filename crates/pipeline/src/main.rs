//! tickbar CLI
//!
//! Loads every trade file in a directory, filters the ticks to the trading
//! session and writes fixed-interval OHLCV bars.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tickbar_core::Config;
use tickbar_pipeline::Pipeline;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "tickbar", version, about = "Aggregate trade ticks into OHLCV bars")]
struct Cli {
    /// Directory of delimited trade files
    data_dir: PathBuf,

    /// Bar interval, e.g. 15m or 1h30m
    #[arg(short, long)]
    interval: Option<String>,

    /// Output table path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum files read in parallel
    #[arg(short, long)]
    workers: Option<usize>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("tickbar=info,tickbar_core=info,tickbar_ingestion=info,tickbar_pipeline=info")
        }))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(interval) = cli.interval {
        config.aggregation.interval = interval;
    }
    if let Some(output) = &cli.output {
        config.aggregation.output_path = output.display().to_string();
    }
    if let Some(workers) = cli.workers {
        config.ingestion.max_workers = workers;
    }
    config.validate()?;

    let interval = config.aggregation.interval.clone();
    let mut pipeline = Pipeline::new(config)?;
    let summary = pipeline
        .run(&cli.data_dir, &interval, cli.output.as_deref())
        .with_context(|| format!("processing {}", cli.data_dir.display()))?;

    info!(
        "Done: {} files ({} failed), {} rows loaded, {} rows cleaned, {} bars -> {}",
        summary.files,
        summary.files_failed,
        summary.rows,
        summary.cleaned,
        summary.bars,
        summary.output.display()
    );

    Ok(())
}
