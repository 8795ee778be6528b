//! OHLCV bar building from clean trade records.
//!
//! Bars are anchored on trades, not on clock boundaries: a bar opens at the
//! timestamp of its first trade and closes when a trade arrives at least one
//! interval later. That trade opens the next bar.

use chrono::NaiveDateTime;
use tickbar_core::{CleanRecord, Error, Interval, OhlcvBar, Result};
use tracing::info;

/// A bar that's currently being built.
#[derive(Debug, Clone)]
struct BarInProgress {
    /// Raw timestamp of the opening trade.
    timestamp: String,
    start: NaiveDateTime,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    trade_count: u32,
}

impl BarInProgress {
    fn new(first: &CleanRecord, size: f64) -> Self {
        Self {
            timestamp: first.raw_timestamp().to_string(),
            start: first.ts,
            open: first.price,
            high: first.price,
            low: first.price,
            close: first.price,
            volume: size,
            trade_count: 1,
        }
    }

    fn add_trade(&mut self, price: f64, size: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += size;
        self.trade_count += 1;
    }

    fn into_bar(self) -> OhlcvBar {
        OhlcvBar {
            timestamp: self.timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            trade_count: self.trade_count,
        }
    }
}

/// Parse a record's size for volume.
fn trade_size(record: &CleanRecord) -> Result<f64> {
    let raw = record.raw_size();
    raw.trim().parse::<f64>().map_err(|_| {
        Error::data(format!(
            "non-numeric size '{}' at {}",
            raw,
            record.raw_timestamp()
        ))
    })
}

/// Builder for fixed-width bars from time-ordered trades.
pub struct BarBuilder {
    interval: Interval,
    current: Option<BarInProgress>,
    completed: Vec<OhlcvBar>,
}

impl BarBuilder {
    /// Create a new bar builder.
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            current: None,
            completed: Vec::new(),
        }
    }

    /// Add the next trade. Trades must arrive in timestamp order.
    pub fn add_trade(&mut self, record: &CleanRecord) -> Result<()> {
        let size = trade_size(record)?;

        if let Some(bar) = self.current.as_mut() {
            if record.ts - bar.start < self.interval.as_delta() {
                bar.add_trade(record.price, size);
                return Ok(());
            }
        }

        if let Some(done) = self.current.replace(BarInProgress::new(record, size)) {
            self.completed.push(done.into_bar());
        }
        Ok(())
    }

    /// Close the open bar, if any, and return every bar in order.
    pub fn finish(mut self) -> Vec<OhlcvBar> {
        if let Some(bar) = self.current.take() {
            self.completed.push(bar.into_bar());
        }
        self.completed
    }
}

/// Sorts clean records by time and folds them into bars.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    interval: Interval,
}

impl Aggregator {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    /// Create an aggregator from an interval expression such as `"15m"`.
    pub fn from_expr(expr: &str) -> Result<Self> {
        Ok(Self::new(Interval::parse(expr)?))
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Build bars from `records`, which are left as they are.
    ///
    /// The sort is stable, so trades with equal timestamps keep their input
    /// order. An empty input yields no bars.
    pub fn aggregate(&self, records: &[CleanRecord]) -> Result<Vec<OhlcvBar>> {
        let mut ordered: Vec<&CleanRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.ts);

        let mut builder = BarBuilder::new(self.interval);
        for record in ordered {
            builder.add_trade(record)?;
        }

        let bars = builder.finish();
        info!("Number of OHLCV bars: {}", bars.len());
        Ok(bars)
    }
}
