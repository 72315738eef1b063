//! Tracker configuration loaded from TOML.
//!
//! Every section is optional. Missing thresholds keep their built-in values,
//! a missing `[delivery]` section keeps the built-in COMEX calendar, and a
//! missing `[storage]` section leaves the directory choice to the caller.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use metaltrack_core::calendar::{default_events, DEFAULT_LOOKAHEAD_DAYS};
use metaltrack_core::{DeliveryCalendar, DeliveryEvent, Evaluator, ThresholdTable};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub thresholds: ThresholdTable,
    pub delivery: DeliveryConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub lookahead_days: i64,
    /// Replaces the built-in calendar when set.
    pub events: Option<Vec<DeliveryEvent>>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            events: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: Option<PathBuf>,
}

impl TrackerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let inverted = self.thresholds.inverted();
        if !inverted.is_empty() {
            let names: Vec<&str> = inverted.iter().map(|m| m.key()).collect();
            return Err(ConfigError::Invalid(format!(
                "thresholds ordered backwards for: {}",
                names.join(", ")
            )));
        }
        if self.delivery.lookahead_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "delivery.lookahead_days must be >= 0, got {}",
                self.delivery.lookahead_days
            )));
        }
        Ok(())
    }

    pub fn calendar(&self) -> DeliveryCalendar {
        let events = self.delivery.events.clone().unwrap_or_else(default_events);
        DeliveryCalendar::new(events, self.delivery.lookahead_days)
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.thresholds, self.calendar())
    }
}
