//! Viewer configuration, read from a TOML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::data::loader::ColumnNames;
use crate::data::model::{Aggregation, Metric, SnapshotOptions};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "AIRLINE_PLAYER_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "airline-player.toml";

/// Airlines tracked when the config omits `airlines`.
pub const DEFAULT_AIRLINES: [&str; 13] = [
    "Air India",
    "US Airways",
    "United Airlines",
    "Emirates",
    "Tigerair",
    "Thai Airways",
    "Japan Airlines",
    "Singapore Airlines",
    "Qatar Airways",
    "Oman Air",
    "British Airways",
    "Lufthansa",
    "KLM Royal Dutch Airlines",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ViewerConfig {
    /// Review file opened at start-up.
    pub data_path: Option<PathBuf>,
    pub tick_interval_ms: u64,
    /// Empty means every airline found in the data.
    pub airlines: Vec<String>,
    /// Year range; either end defaults to the earliest/latest review year.
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub aggregation: Aggregation,
    /// One animated chart per metric, in this order.
    pub metrics: Vec<Metric>,
    pub columns: ColumnNames,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            tick_interval_ms: 1000,
            airlines: DEFAULT_AIRLINES.iter().map(|a| a.to_string()).collect(),
            first_year: None,
            last_year: None,
            aggregation: Aggregation::default(),
            metrics: vec![Metric::OverallRating, Metric::RecommendedShare],
            columns: ColumnNames::default(),
        }
    }
}

impl ViewerConfig {
    pub fn parse(text: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(text).context("parsing config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Resolve the config file from the environment or the working directory.
    /// Falls back to defaults (with an error log) when the file is unusable.
    pub fn discover() -> Self {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.exists() {
                    log::debug!("No {DEFAULT_CONFIG_FILE}; using defaults");
                    return Self::default();
                }
                local
            }
        };

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.tick_interval_ms > 0, "tick-interval-ms must be greater than 0");
        if let (Some(first), Some(last)) = (self.first_year, self.last_year) {
            ensure!(first <= last, "first-year {first} is after last-year {last}");
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            airlines: self.airlines.clone(),
            first_year: self.first_year,
            last_year: self.last_year,
            aggregation: self.aggregation,
        }
    }
}
