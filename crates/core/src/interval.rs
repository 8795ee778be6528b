//! Compact duration expressions such as `"15m"` or `"1h30m"`.

use crate::error::{Error, Result};
use chrono::TimeDelta;
use std::fmt;
use std::str::FromStr;

/// Largest interval representable as a `TimeDelta`.
pub const MAX_INTERVAL_SECONDS: i64 = i64::MAX / 1_000;

/// Seconds per unit character.
fn unit_seconds(unit: char) -> Option<i64> {
    match unit {
        'd' => Some(86_400),
        'h' => Some(3_600),
        'm' => Some(60),
        's' => Some(1),
        _ => None,
    }
}

/// Parse an interval expression into total seconds.
///
/// The expression is a run of `<digits><unit>` segments with no separators,
/// units being `d`, `h`, `m` and `s`. Digits after the last unit are
/// discarded, so `"15"` yields 0 and `"1h30"` yields 3600.
pub fn parse_interval(expr: &str) -> Result<i64> {
    let mut total: i64 = 0;
    let mut digits = String::new();

    for c in expr.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let per_unit = unit_seconds(c).ok_or_else(|| {
            Error::interval_format(format!("unexpected character '{}' in '{}'", c, expr))
        })?;
        if digits.is_empty() {
            return Err(Error::interval_format(format!(
                "unit '{}' has no preceding number in '{}'",
                c, expr
            )));
        }

        total = digits
            .parse::<i64>()
            .ok()
            .and_then(|n| n.checked_mul(per_unit))
            .and_then(|secs| total.checked_add(secs))
            .filter(|secs| *secs <= MAX_INTERVAL_SECONDS)
            .ok_or_else(|| Error::interval_format(format!("'{}' overflows", expr)))?;
        digits.clear();
    }

    Ok(total)
}

/// A parsed bar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    seconds: i64,
}

impl Interval {
    /// Parse an interval expression, see [`parse_interval`].
    pub fn parse(expr: &str) -> Result<Self> {
        parse_interval(expr).map(Self::from_seconds)
    }

    /// Clamped to `[0, MAX_INTERVAL_SECONDS]`.
    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            seconds: seconds.clamp(0, MAX_INTERVAL_SECONDS),
        }
    }

    #[inline]
    pub fn as_seconds(&self) -> i64 {
        self.seconds
    }

    #[inline]
    pub fn as_delta(&self) -> TimeDelta {
        TimeDelta::seconds(self.seconds)
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}
