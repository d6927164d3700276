//! Temperature readings, outdoor weather samples and calibration records.

use super::sensor::SensorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indoor temperature sample. Append-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    /// Sensor that produced the reading.
    pub sensor_id: SensorId,
    /// When the reading was taken.
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius.
    pub temperature: f64,
}

impl TemperatureReading {
    /// Creates a reading.
    #[must_use]
    pub fn new(sensor_id: SensorId, timestamp: DateTime<Utc>, temperature: f64) -> Self {
        Self { sensor_id, timestamp, temperature }
    }
}

/// An outdoor weather sample. Reference data, not owned by any sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutdoorCondition {
    /// Sample time.
    pub timestamp: DateTime<Utc>,
    /// Outdoor temperature in Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// WMO weather code (0 = clear sky, 3 = overcast, 61 = light rain, ...).
    pub weather_code: u16,
}

impl OutdoorCondition {
    /// Returns the chronologically latest sample, if any.
    #[must_use]
    pub fn latest(samples: &[Self]) -> Option<&Self> {
        samples.iter().max_by_key(|c| c.timestamp)
    }
}

/// An administrative calibration event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Calibrated sensor.
    pub sensor_id: SensorId,
    /// When the calibration happened.
    pub calibrated_at: DateTime<Utc>,
    /// Optional description.
    pub notes: Option<String>,
}
