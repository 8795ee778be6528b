//! Validation, session filtering and deduplication of raw trade records.
//!
//! A record is kept only if every field is non-empty, its timestamp parses,
//! it falls on a weekday inside the session window, its price is a positive
//! number, and its (timestamp, price, size) strings have not been seen
//! earlier in the same pass. Rejected records are counted, never reported
//! individually.

use crate::buffer::RawBuffer;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use tickbar_core::{
    parse_timestamp, CleanRecord, Config, RawRecord, RecordKey, Result, SessionWindow,
};
use tracing::{debug, info};

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Some field is empty or absent.
    MissingField,
    /// Timestamp is not `YYYY-MM-DD HH:MM:SS.ffffff`.
    BadTimestamp,
    /// Saturday or Sunday.
    Weekend,
    /// Time of day outside the session window.
    OutsideSession,
    /// Price is not a number or not strictly positive.
    BadPrice,
    /// Identity triple already kept in this pass.
    Duplicate,
}

/// Statistics about one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningStats {
    /// Records examined.
    pub total: u64,
    /// Records kept.
    pub kept: u64,
    pub missing_field: u64,
    pub bad_timestamp: u64,
    pub weekend: u64,
    pub outside_session: u64,
    pub bad_price: u64,
    pub duplicate: u64,
}

impl CleaningStats {
    /// Records dropped for any reason.
    pub fn dropped(&self) -> u64 {
        self.total - self.kept
    }

    /// Fraction of examined records that were kept.
    pub fn kept_frac(&self) -> f64 {
        if self.total > 0 {
            self.kept as f64 / self.total as f64
        } else {
            0.0
        }
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingField => self.missing_field += 1,
            DropReason::BadTimestamp => self.bad_timestamp += 1,
            DropReason::Weekend => self.weekend += 1,
            DropReason::OutsideSession => self.outside_session += 1,
            DropReason::BadPrice => self.bad_price += 1,
            DropReason::Duplicate => self.duplicate += 1,
        }
    }

    /// Reset statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Single-threaded record cleaner.
pub struct Cleaner {
    window: SessionWindow,
    /// Sort by origin before classifying.
    deterministic_order: bool,
    /// Identity triples kept in the current pass.
    seen: HashSet<RecordKey>,
    stats: CleaningStats,
}

impl Cleaner {
    /// Create a cleaner for the given session window.
    pub fn new(window: SessionWindow, deterministic_order: bool) -> Self {
        Self {
            window,
            deterministic_order,
            seen: HashSet::new(),
            stats: CleaningStats::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.session.window()?,
            config.ingestion.deterministic_order,
        ))
    }

    /// Per-record predicates: parsed timestamp and price on success.
    fn check(&self, raw: &RawRecord) -> std::result::Result<(NaiveDateTime, f64), DropReason> {
        if raw.has_missing_field() {
            return Err(DropReason::MissingField);
        }

        let ts = raw
            .timestamp()
            .and_then(parse_timestamp)
            .ok_or(DropReason::BadTimestamp)?;

        if !SessionWindow::is_trading_day(&ts) {
            return Err(DropReason::Weekend);
        }
        if !self.window.contains_time(&ts) {
            return Err(DropReason::OutsideSession);
        }

        let price = raw
            .price()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .filter(|p| *p > 0.0)
            .ok_or(DropReason::BadPrice)?;

        Ok((ts, price))
    }

    /// Check the per-record predicates, without deduplication.
    pub fn validate(&self, raw: &RawRecord) -> std::result::Result<CleanRecord, DropReason> {
        let (ts, price) = self.check(raw)?;
        Ok(CleanRecord {
            ts,
            price,
            raw: raw.clone(),
        })
    }

    /// Classify one record against the current pass.
    fn classify(&mut self, raw: RawRecord) -> std::result::Result<CleanRecord, DropReason> {
        let (ts, price) = self.check(&raw)?;
        let key = raw.key().ok_or(DropReason::MissingField)?;
        if !self.seen.insert(key) {
            return Err(DropReason::Duplicate);
        }
        Ok(CleanRecord { ts, price, raw })
    }

    /// Run one cleaning pass over `records`.
    ///
    /// The duplicate set starts empty on every call. Output keeps input
    /// order (origin order when `deterministic_order` is set).
    pub fn clean(&mut self, mut records: Vec<RawRecord>) -> Vec<CleanRecord> {
        self.seen.clear();
        self.stats.reset();

        if self.deterministic_order {
            records.sort_by_key(|r| r.origin);
        }

        let mut kept = Vec::with_capacity(records.len());
        for raw in records {
            self.stats.total += 1;
            match self.classify(raw) {
                Ok(clean) => {
                    self.stats.kept += 1;
                    kept.push(clean);
                }
                Err(reason) => self.stats.record_drop(reason),
            }
        }

        debug!("Cleaning stats: {:?}", self.stats);
        info!(
            "Number of cleaned rows: {} ({:.1}% kept)",
            kept.len(),
            self.stats.kept_frac() * 100.0
        );

        kept
    }

    /// Drain `buffer` and clean its contents.
    pub fn clean_buffer(&mut self, buffer: &RawBuffer) -> Vec<CleanRecord> {
        self.clean(buffer.drain())
    }

    /// Statistics of the last pass.
    pub fn stats(&self) -> &CleaningStats {
        &self.stats
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(SessionWindow::default(), true)
    }
}
