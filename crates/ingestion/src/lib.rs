//! Data ingestion and normalization for the tickbar pipeline.
//!
//! This crate handles:
//! - Reading trade files from a directory
//! - Bounded parallel loading into a shared buffer
//! - Validation, session filtering and deduplication
//! - OHLCV bar building

pub mod source;
pub mod buffer;
pub mod pool;
pub mod cleaner;
pub mod bar_builder;

pub use source::{read_records, RecordSource};
pub use buffer::RawBuffer;
pub use pool::{IngestionPool, IngestionSummary};
pub use cleaner::{Cleaner, CleaningStats, DropReason};
pub use bar_builder::{Aggregator, BarBuilder};
