//! Directory-to-OHLCV pipeline for the tickbar system.
//!
//! Wires the ingestion crate's stages together and writes the bar table.

pub mod pipeline;
pub mod writer;

pub use pipeline::{Pipeline, RunSummary, Stage};
pub use writer::{write_bars, BAR_COLUMNS};
