//! Bounded parallel ingestion of trade files.

use crate::buffer::RawBuffer;
use crate::source::{read_records, RecordSource};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tickbar_core::config::IngestionConfig;
use tickbar_core::{Error, Result};
use tracing::{debug, info, warn};

/// Counts reported after an ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    /// Candidate files seen.
    pub files: usize,
    /// Files that failed and contributed nothing.
    pub files_failed: usize,
    /// Records appended to the buffer.
    pub rows: usize,
}

/// Worker pool that reads files in parallel into a shared [`RawBuffer`].
#[derive(Debug, Clone)]
pub struct IngestionPool {
    /// Maximum files processed at once (0 = one per CPU).
    max_workers: usize,
}

impl IngestionPool {
    /// Create a pool with the given parallelism bound.
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    pub fn from_config(config: &IngestionConfig) -> Self {
        Self::new(config.max_workers)
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Read every file of the source directory into `buffer`.
    pub fn load_dir(&self, source: &RecordSource, buffer: &RawBuffer) -> Result<IngestionSummary> {
        let files = source.list_files()?;
        self.ingest(&files, buffer)
    }

    /// Read `files` into `buffer`, one task per file.
    ///
    /// A file's index in `files` becomes its records' origin. Returns only
    /// after every worker has finished; failed files are logged and counted.
    pub fn ingest(&self, files: &[PathBuf], buffer: &RawBuffer) -> Result<IngestionSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|i| format!("tickbar-ingest-{}", i))
            .build()
            .map_err(|e| Error::worker_pool(e.to_string()))?;

        let rows = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        pool.install(|| {
            files
                .par_iter()
                .with_max_len(1)
                .enumerate()
                .for_each(|(file_index, path)| match read_records(path, file_index) {
                    Ok(records) => {
                        debug!("Read {} rows from {}", records.len(), path.display());
                        rows.fetch_add(records.len(), Ordering::Relaxed);
                        buffer.extend(records);
                    }
                    Err(e) => {
                        warn!("Skipping file: {}", e);
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                })
        });

        let summary = IngestionSummary {
            files: files.len(),
            files_failed: failed.into_inner(),
            rows: rows.into_inner(),
        };

        info!("Number of loaded rows: {}", summary.rows);
        info!(
            "Number of loaded files: {} ({} failed)",
            summary.files, summary.files_failed
        );

        Ok(summary)
    }
}

impl Default for IngestionPool {
    fn default() -> Self {
        Self::from_config(&IngestionConfig::default())
    }
}
