//! Pipeline driver: load, clean, aggregate.
//!
//! The three stages must run in that order, once each. Calling a stage early
//! is not an error: it sees an empty input and reports a zero count.

use crate::writer::write_bars;
use std::path::{Path, PathBuf};
use tickbar_core::{CleanRecord, Config, OhlcvBar, Result};
use tickbar_ingestion::{
    Aggregator, Cleaner, CleaningStats, IngestionPool, IngestionSummary, RawBuffer, RecordSource,
};
use tracing::{info, warn};

/// Last completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    New,
    Loaded,
    Cleaned,
    Aggregated,
}

/// Counts for a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub files_failed: usize,
    pub rows: usize,
    pub cleaned: usize,
    pub bars: usize,
    pub output: PathBuf,
}

/// Directory-to-bars pipeline.
pub struct Pipeline {
    config: Config,
    pool: IngestionPool,
    cleaner: Cleaner,
    buffer: RawBuffer,
    cleaned: Vec<CleanRecord>,
    bars: Vec<OhlcvBar>,
    stage: Stage,
}

impl Pipeline {
    /// Create a pipeline. Fails if the session window is invalid.
    pub fn new(config: Config) -> Result<Self> {
        let cleaner = Cleaner::from_config(&config)?;
        Ok(Self {
            pool: IngestionPool::from_config(&config.ingestion),
            cleaner,
            config,
            buffer: RawBuffer::new(),
            cleaned: Vec::new(),
            bars: Vec::new(),
            stage: Stage::New,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Read every file in `dir` into the raw buffer.
    ///
    /// Unreadable files are skipped; a missing directory is an error.
    pub fn load(&mut self, dir: impl AsRef<Path>) -> Result<IngestionSummary> {
        let dir = dir.as_ref();
        if self.stage != Stage::New {
            warn!("load called after {:?}; adding to the existing buffer", self.stage);
        }

        info!("Loading trade files from {}", dir.display());
        let summary = self
            .pool
            .load_dir(&RecordSource::new(dir), &self.buffer)?;
        self.stage = Stage::Loaded;
        Ok(summary)
    }

    /// Drain the raw buffer into the clean record set. Returns the kept count.
    pub fn clean(&mut self) -> usize {
        if self.stage != Stage::Loaded {
            warn!("clean called at stage {:?}, expected Loaded", self.stage);
        }

        self.cleaned = self.cleaner.clean_buffer(&self.buffer);
        self.stage = Stage::Cleaned;
        self.cleaned.len()
    }

    /// Build bars from the clean set and write them to `output`
    /// (the configured path when `None`). Returns the bar count.
    ///
    /// Any error aborts the call and leaves the clean set in place; it is
    /// only consumed once the bars are written.
    pub fn aggregate(&mut self, interval: &str, output: Option<&Path>) -> Result<usize> {
        if self.stage != Stage::Cleaned {
            warn!("aggregate called at stage {:?}, expected Cleaned", self.stage);
        }

        let aggregator = Aggregator::from_expr(interval)?;
        let output = self.output_path(output);

        self.bars = aggregator.aggregate(&self.cleaned)?;
        write_bars(&output, &self.bars)?;
        self.cleaned.clear();
        self.stage = Stage::Aggregated;

        info!("OHLCV data written to {}", output.display());
        Ok(self.bars.len())
    }

    /// Run all three stages.
    pub fn run(
        &mut self,
        dir: impl AsRef<Path>,
        interval: &str,
        output: Option<&Path>,
    ) -> Result<RunSummary> {
        let loaded = self.load(dir)?;
        let cleaned = self.clean();
        let bars = self.aggregate(interval, output)?;

        Ok(RunSummary {
            files: loaded.files,
            files_failed: loaded.files_failed,
            rows: loaded.rows,
            cleaned,
            bars,
            output: self.output_path(output),
        })
    }

    fn output_path(&self, output: Option<&Path>) -> PathBuf {
        output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.config.aggregation.output_path))
    }

    /// Bars from the last `aggregate` call.
    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    /// Clean records waiting for aggregation.
    pub fn cleaned(&self) -> &[CleanRecord] {
        &self.cleaned
    }

    /// Statistics of the last cleaning pass.
    pub fn cleaning_stats(&self) -> &CleaningStats {
        self.cleaner.stats()
    }
}
