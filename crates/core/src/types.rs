//! Core data types for the tickbar pipeline.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Column holding the trade timestamp.
pub const TIMESTAMP_FIELD: &str = "Timestamp";
/// Column holding the trade price.
pub const PRICE_FIELD: &str = "Price";
/// Column holding the trade size.
pub const SIZE_FIELD: &str = "Size";

/// Columns every input file header must name.
pub const REQUIRED_FIELDS: [&str; 3] = [TIMESTAMP_FIELD, PRICE_FIELD, SIZE_FIELD];

/// Where a raw record was read from.
///
/// Ordering is (file index, row), so sorting by origin reproduces the
/// directory enumeration order regardless of which worker finished first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordOrigin {
    /// Position of the file in the sorted directory listing.
    pub file_index: usize,
    /// Zero-based data row within the file (header excluded).
    pub row: usize,
}

impl RecordOrigin {
    pub fn new(file_index: usize, row: usize) -> Self {
        Self { file_index, row }
    }
}

/// One trade tick as read from disk: field name to raw string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Source position.
    pub origin: RecordOrigin,
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Create a record from (field, value) pairs.
    pub fn new<K, V>(origin: RecordOrigin, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            origin,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[inline]
    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP_FIELD)
    }

    #[inline]
    pub fn price(&self) -> Option<&str> {
        self.get(PRICE_FIELD)
    }

    #[inline]
    pub fn size(&self) -> Option<&str> {
        self.get(SIZE_FIELD)
    }

    /// True if any field is empty or a required field is absent.
    pub fn has_missing_field(&self) -> bool {
        self.fields.values().any(String::is_empty)
            || REQUIRED_FIELDS.iter().any(|f| !self.fields.contains_key(*f))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deduplication key, `None` if a required field is absent.
    pub fn key(&self) -> Option<RecordKey> {
        Some(RecordKey {
            timestamp: self.timestamp()?.to_string(),
            price: self.price()?.to_string(),
            size: self.size()?.to_string(),
        })
    }
}

/// Identity triple used for deduplication.
///
/// Compared as raw strings: `"10.0"` and `"10.00"` are distinct prices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub timestamp: String,
    pub price: String,
    pub size: String,
}

/// A raw record that passed every cleaning predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    /// Parsed trade time (session-local, no timezone).
    pub ts: NaiveDateTime,
    /// Parsed trade price, always > 0.
    pub price: f64,
    /// The record as read.
    pub raw: RawRecord,
}

impl CleanRecord {
    /// Raw timestamp string, as written in the source file.
    pub fn raw_timestamp(&self) -> &str {
        self.raw.timestamp().unwrap_or_default()
    }

    /// Raw size string, parsed at aggregation time.
    pub fn raw_size(&self) -> &str {
        self.raw.size().unwrap_or_default()
    }
}

/// OHLCV bar over one interval.
///
/// Serializes to the output table columns
/// `Timestamp,Open,High,Low,Close,Volume`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvBar {
    /// Timestamp of the first contributing trade, as written in its source file.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    /// Number of trades.
    #[serde(skip)]
    pub trade_count: u32,
}
