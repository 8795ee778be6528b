//! Configuration structures for the tickbar pipeline.

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::session::SessionWindow;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ingestion configuration.
    pub ingestion: IngestionConfig,
    /// Session window configuration.
    pub session: SessionConfig,
    /// Aggregation configuration.
    pub aggregation: AggregationConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing sections take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every section is usable.
    pub fn validate(&self) -> Result<()> {
        self.session.window()?;
        Interval::parse(&self.aggregation.interval)
            .map_err(|e| Error::config(format!("aggregation.interval: {}", e)))?;
        Ok(())
    }
}

/// File ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Maximum files read in parallel (0 = one worker per CPU).
    pub max_workers: usize,
    /// Order drained records by (file, row) before cleaning so the
    /// duplicate that survives does not depend on worker scheduling.
    pub deterministic_order: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            deterministic_order: true,
        }
    }
}

/// Trading session configuration. Trading days are Monday to Friday.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session open, `HH:MM:SS`, inclusive.
    pub open: String,
    /// Session close, `HH:MM:SS`, inclusive.
    pub close: String,
}

impl SessionConfig {
    /// Parse into a session window.
    pub fn window(&self) -> Result<SessionWindow> {
        SessionWindow::parse(&self.open, &self.close)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            open: "09:30:00".to_string(),
            close: "16:00:00".to_string(),
        }
    }
}

/// Bar aggregation and output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Interval expression, e.g. `"15m"`.
    pub interval: String,
    /// Output table path.
    pub output_path: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            interval: "15m".to_string(),
            output_path: "ohlcvOutput.csv".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ingestion.max_workers, 10);
        assert!(config.ingestion.deterministic_order);
        assert_eq!(config.aggregation.interval, "15m");
        assert_eq!(config.aggregation.output_path, "ohlcvOutput.csv");
        assert_eq!(config.session.window().unwrap(), SessionWindow::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"aggregation": {{"interval": "1h"}}}}"#).unwrap();

        let config = Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.aggregation.interval, "1h");
        assert_eq!(config.aggregation.output_path, "ohlcvOutput.csv");
        assert_eq!(config.ingestion.max_workers, 10);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = Config::default();
        config.session.open = "17:00:00".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.aggregation.interval = "15q".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_json_file("/nonexistent/tickbar.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
