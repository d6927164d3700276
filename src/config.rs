//! Configuration for the campus IoT core.
//!
//! Supports YAML configuration with precedence: file > defaults. Every
//! section and field is optional.
//!
//! ```yaml
//! version: 1
//! thresholds:
//!   acceptable_low: 20.0
//!   acceptable_high: 24.0
//! simulator:
//!   min_temp: 18.0
//!   max_temp: 26.0
//!   seed: 7
//! aggregation:
//!   window_secs: 3600
//!   history_hours: 2
//! notifications:
//!   feed_capacity: 100
//! ```

use crate::analysis::advisor::{ACCEPTABLE_HIGH, ACCEPTABLE_LOW};
use crate::error::{CampusError, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

/// Comfort band used by the thermostat advisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Below this temperature (°C) a room is too cold.
    #[serde(default = "default_acceptable_low")]
    pub acceptable_low: f64,

    /// Above this temperature (°C) a room is too warm.
    #[serde(default = "default_acceptable_high")]
    pub acceptable_high: f64,
}

fn default_acceptable_low() -> f64 {
    ACCEPTABLE_LOW
}
fn default_acceptable_high() -> f64 {
    ACCEPTABLE_HIGH
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            acceptable_low: default_acceptable_low(),
            acceptable_high: default_acceptable_high(),
        }
    }
}

/// Live telemetry simulator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Lowest simulated temperature (°C).
    #[serde(default = "default_min_temp")]
    pub min_temp: f64,

    /// Highest simulated temperature (°C).
    #[serde(default = "default_max_temp")]
    pub max_temp: f64,

    /// Fixed seed for reproducible runs. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_temp() -> f64 {
    18.0
}
fn default_max_temp() -> f64 {
    26.0
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { min_temp: default_min_temp(), max_temp: default_max_temp(), seed: None }
    }
}

/// Feature aggregation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Trailing window for the average temperature, in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How many hours of readings the dashboard loads before aggregating.
    #[serde(default = "default_history_hours")]
    pub history_hours: u64,
}

fn default_window_secs() -> u64 {
    3600
}
fn default_history_hours() -> u64 {
    2
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { window_secs: default_window_secs(), history_hours: default_history_hours() }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Number of status changes the dashboard feed retains.
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
}

fn default_feed_capacity() -> usize {
    100
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { feed_capacity: default_feed_capacity() }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Thermostat comfort band.
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Live telemetry simulator.
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Feature aggregation.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Status notifications.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            thresholds: ThresholdConfig::default(),
            simulator: SimulatorConfig::default(),
            aggregation: AggregationConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CampusError::ConfigNotFound(path.display().to_string()),
            _ => CampusError::Io(e),
        })?;

        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            CampusError::ConfigParse { line, message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|err| {
            log::debug!("using default configuration ({err})");
            Self::default()
        })
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CampusError::ConfigInvalid`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, message: &str| -> Result<()> {
            Err(CampusError::ConfigInvalid { key: key.to_string(), message: message.to_string() })
        };

        if self.thresholds.acceptable_low >= self.thresholds.acceptable_high {
            return invalid("thresholds.acceptable_low", "must be below acceptable_high");
        }
        if self.simulator.min_temp > self.simulator.max_temp {
            return invalid("simulator.min_temp", "must not exceed max_temp");
        }
        if !self.simulator.min_temp.is_finite() || !self.simulator.max_temp.is_finite() {
            return invalid("simulator", "temperature range must be finite");
        }
        if self.aggregation.window_secs == 0 {
            return invalid("aggregation.window_secs", "must be positive");
        }
        if self.aggregation.window_secs > TimeDelta::MAX.num_seconds().unsigned_abs() {
            return invalid("aggregation.window_secs", "exceeds the representable time span");
        }
        if self.aggregation.history_hours > TimeDelta::MAX.num_hours().unsigned_abs() {
            return invalid("aggregation.history_hours", "exceeds the representable time span");
        }
        if self.notifications.feed_capacity == 0 {
            return invalid("notifications.feed_capacity", "must be positive");
        }
        Ok(())
    }

    /// Trailing average window, saturating at [`TimeDelta::MAX`].
    #[must_use]
    pub fn average_window(&self) -> TimeDelta {
        seconds_saturating(self.aggregation.window_secs)
    }

    /// Historical readings lookback, saturating at [`TimeDelta::MAX`].
    #[must_use]
    pub fn history_lookback(&self) -> TimeDelta {
        i64::try_from(self.aggregation.history_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .unwrap_or(TimeDelta::MAX)
    }
}

/// `secs` as a [`TimeDelta`], or [`TimeDelta::MAX`] when out of range.
pub(crate) fn seconds_saturating(secs: u64) -> TimeDelta {
    i64::try_from(secs).ok().and_then(TimeDelta::try_seconds).unwrap_or(TimeDelta::MAX)
}
