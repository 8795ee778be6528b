//! Output table writer.

use csv::WriterBuilder;
use std::path::Path;
use tickbar_core::{Error, OhlcvBar, Result};

/// Output table header.
pub const BAR_COLUMNS: [&str; 6] = ["Timestamp", "Open", "High", "Low", "Close", "Volume"];

/// Write bars to `path`, header first, one row per bar.
///
/// The header is written even when `bars` is empty.
pub fn write_bars(path: &Path, bars: &[OhlcvBar]) -> Result<()> {
    let write_error = |e: csv::Error| Error::output_write(format!("{}: {}", path.display(), e));

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_error)?;

    writer.write_record(BAR_COLUMNS).map_err(write_error)?;
    for bar in bars {
        writer.serialize(bar).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|e| Error::output_write(format!("{}: {}", path.display(), e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(timestamp: &str, open: f64, high: f64, low: f64, close: f64, volume: f64) -> OhlcvBar {
        OhlcvBar {
            timestamp: timestamp.to_string(),
            open,
            high,
            low,
            close,
            volume,
            trade_count: 1,
        }
    }

    #[test]
    fn test_write_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        let bars = vec![
            make_bar("2024-09-16 09:30:00.000", 10.0, 12.0, 9.0, 11.0, 10.0),
            make_bar("2024-09-16 09:45:00.100", 11.25, 11.5, 11.0, 11.5, 2.5),
        ];

        write_bars(&path, &bars).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Timestamp,Open,High,Low,Close,Volume");
        assert_eq!(lines[1], "2024-09-16 09:30:00.000,10.0,12.0,9.0,11.0,10.0");
        assert_eq!(lines[2], "2024-09-16 09:45:00.100,11.25,11.5,11.0,11.5,2.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_header_only_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_bars(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Timestamp,Open,High,Low,Close,Volume\n");
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("bars.csv");

        let err = write_bars(&path, &[]).unwrap_err();
        assert!(matches!(err, Error::OutputWrite(_)));
    }
}
