//! Core types and configuration for the tickbar pipeline.
//!
//! This crate provides shared types used across all other crates:
//! - Record and bar types (raw ticks, clean ticks, OHLCV bars)
//! - Timestamp parsing and the trading session window
//! - Interval expressions
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod interval;
pub mod session;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use interval::{parse_interval, Interval};
pub use session::{parse_timestamp, SessionWindow};
pub use types::*;
