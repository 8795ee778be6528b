//! Trade timestamp parsing and the trading session window.
//!
//! Timestamps are session-local wall-clock times; no timezone conversion is
//! applied anywhere in the pipeline.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// Format of the whole-second part of a trade timestamp.
const SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Byte layout of the whole-second part: `0` marks a digit.
const SECONDS_LAYOUT: &[u8; 19] = b"0000-00-00 00:00:00";

/// Maximum digits accepted after the decimal point (microseconds).
const MAX_FRACTION_DIGITS: usize = 6;

/// Parse a trade timestamp of the form `YYYY-MM-DD HH:MM:SS.ffffff`.
///
/// The fractional part is mandatory and may have 1 to 6 digits; it is read
/// as a decimal fraction of a second (`.5` is 500 000 µs).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let (whole, frac) = s.rsplit_once('.')?;
    if frac.is_empty()
        || frac.len() > MAX_FRACTION_DIGITS
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    if !matches_layout(whole) {
        return None;
    }

    let base = NaiveDateTime::parse_from_str(whole, SECONDS_FORMAT).ok()?;
    // chrono reads second 60 as a leap second
    if base.nanosecond() >= 1_000_000_000 {
        return None;
    }

    let scale = 10i64.pow((MAX_FRACTION_DIGITS - frac.len()) as u32);
    let micros: i64 = frac.parse::<i64>().ok()? * scale;

    base.checked_add_signed(TimeDelta::microseconds(micros))
}

/// Fixed-width check; chrono alone tolerates padding inside numeric fields.
fn matches_layout(whole: &str) -> bool {
    whole.len() == SECONDS_LAYOUT.len()
        && whole
            .bytes()
            .zip(SECONDS_LAYOUT.iter())
            .all(|(b, &l)| if l == b'0' { b.is_ascii_digit() } else { b == l })
}

/// Parse a clock time such as `"09:30:00"`.
pub fn parse_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .map_err(|e| Error::config(format!("invalid clock time '{}': {}", s, e)))
}

/// Inclusive clock-time window during which trades are valid, Monday to Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    open: NaiveTime,
    close: NaiveTime,
}

impl SessionWindow {
    /// Create a window. `open` must not be after `close`.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self> {
        if open > close {
            return Err(Error::config(format!(
                "session open {} is after close {}",
                open, close
            )));
        }
        Ok(Self { open, close })
    }

    /// Create a window from `HH:MM:SS` strings.
    pub fn parse(open: &str, close: &str) -> Result<Self> {
        Self::new(parse_clock(open)?, parse_clock(close)?)
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }

    /// Monday through Friday.
    #[inline]
    pub fn is_trading_day(ts: &NaiveDateTime) -> bool {
        ts.weekday().num_days_from_monday() <= 4
    }

    /// Time of day within `[open, close]`, sub-second precision included.
    #[inline]
    pub fn contains_time(&self, ts: &NaiveDateTime) -> bool {
        let t = ts.time();
        t >= self.open && t <= self.close
    }
}

impl Default for SessionWindow {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 30, 0).expect("09:30:00 is a valid time"),
            close: NaiveTime::from_hms_opt(16, 0, 0).expect("16:00:00 is a valid time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timestamp_micros() {
        let ts = parse_timestamp("2024-09-16 09:30:00.123456").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 9, 16).unwrap());
        assert_eq!(ts.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_parse_timestamp_short_fraction() {
        let ts = parse_timestamp("2024-09-16 09:30:00.5").unwrap();
        assert_eq!(ts.nanosecond(), 500_000_000);
        let ts = parse_timestamp("2024-09-16 09:30:00.000").unwrap();
        assert_eq!(ts.nanosecond(), 0);
    }

    #[test]
    fn test_parse_timestamp_rejects() {
        assert!(parse_timestamp("2024-09-16 09:30:00").is_none());
        assert!(parse_timestamp("2024-09-16 09:30:00.").is_none());
        assert!(parse_timestamp("2024-09-16 09:30:00.1234567").is_none());
        assert!(parse_timestamp("2024-09-16T09:30:00.000").is_none());
        assert!(parse_timestamp("2024-13-16 09:30:00.000").is_none());
        assert!(parse_timestamp("2024-09-16 09:30:00.12a").is_none());
        assert!(parse_timestamp("not a timestamp").is_none());
        assert!(parse_timestamp("2024-09-16 09:30: 5.000").is_none());
        assert!(parse_timestamp("2024-09-16  9:30:05.000").is_none());
        assert!(parse_timestamp("2024-9-16 09:30:05.000").is_none());
        assert!(parse_timestamp(" 2024-09-16 09:30:05.000").is_none());
    }

    #[test]
    fn test_parse_timestamp_rejects_leap_second() {
        assert!(parse_timestamp("2024-09-16 15:59:60.500").is_none());
        assert!(parse_timestamp("2024-09-16 15:59:59.999999").is_some());
    }

    #[test]
    fn test_session_bounds_inclusive() {
        let window = SessionWindow::default();
        let at = |s: &str| parse_timestamp(s).unwrap();

        assert!(window.contains_time(&at("2024-09-16 09:30:00.000")));
        assert!(window.contains_time(&at("2024-09-16 16:00:00.000")));
        assert!(!window.contains_time(&at("2024-09-16 09:29:59.999999")));
        assert!(!window.contains_time(&at("2024-09-16 16:00:00.000001")));
    }

    #[test]
    fn test_trading_day() {
        // 2024-09-16 is a Monday
        let monday = parse_timestamp("2024-09-16 10:00:00.0").unwrap();
        let friday = parse_timestamp("2024-09-20 10:00:00.0").unwrap();
        let saturday = parse_timestamp("2024-09-21 10:00:00.0").unwrap();
        let sunday = parse_timestamp("2024-09-22 10:00:00.0").unwrap();

        assert!(SessionWindow::is_trading_day(&monday));
        assert!(SessionWindow::is_trading_day(&friday));
        assert!(!SessionWindow::is_trading_day(&saturday));
        assert!(!SessionWindow::is_trading_day(&sunday));
    }

    #[test]
    fn test_window_parse() {
        let window = SessionWindow::parse("08:00:00", "17:30:00").unwrap();
        assert_eq!(window.open(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert!(SessionWindow::parse("17:00:00", "08:00:00").is_err());
        assert!(SessionWindow::parse("9:30", "16:00:00").is_err());
    }
}
