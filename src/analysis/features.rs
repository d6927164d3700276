//! Per-sensor feature aggregation.
//!
//! Fuses four sources into one [`SensorFeatureVector`] per sensor:
//!
//! 1. feedback rating counts over the full feedback collection,
//! 2. a trailing-window average of historical readings,
//! 3. the live temperature from the simulator,
//! 4. the chronologically latest outdoor sample.
//!
//! Missing inputs never fail. A sensor without a live reading gets
//! `current_temp = None`. A sensor without readings inside the window
//! averages to its live temperature, or to [`DEFAULT_AVERAGE_TEMP`] if that is
//! missing too; [`AverageSource`] records which one applied. No outdoor
//! samples leaves the outdoor fields empty.

use crate::config::{seconds_saturating, AggregationConfig};
use crate::model::{
    FeedbackCounts, FeedbackRecord, OutdoorCondition, Sensor, SensorId, TemperatureReading,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default trailing window for the average temperature, in seconds.
pub const AVERAGE_WINDOW_SECS: u64 = 3600;

/// Average reported when a sensor has neither recent readings nor a live value.
pub const DEFAULT_AVERAGE_TEMP: f64 = 0.0;

/// Per-sensor `(timestamp, temperature)` history.
pub type HistoricalTemps = HashMap<SensorId, Vec<(DateTime<Utc>, f64)>>;

/// Where a feature vector's average temperature came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageSource {
    /// Mean of readings inside the window.
    Historical,
    /// No readings in the window; the live temperature was used.
    LiveFallback,
    /// No readings and no live temperature; [`DEFAULT_AVERAGE_TEMP`] was used.
    Default,
}

/// Derived per-sensor snapshot. Rebuilt on every dashboard request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFeatureVector {
    /// Sensor id.
    pub sensor_id: SensorId,
    /// Sensor location.
    pub location: String,
    /// When the vector was computed.
    pub timestamp: DateTime<Utc>,
    /// Live temperature, if the simulator produced one.
    pub current_temp: Option<f64>,
    /// Trailing-window average temperature.
    pub avg_temp_1h: f64,
    /// Source of `avg_temp_1h`.
    pub avg_source: AverageSource,
    /// "hot" ratings for this sensor.
    pub feedback_hot: usize,
    /// "ok" ratings for this sensor.
    pub feedback_ok: usize,
    /// "cold" ratings for this sensor.
    pub feedback_cold: usize,
    /// Sum of the three rating counts.
    pub total_feedback_count: usize,
    /// Latest outdoor temperature.
    pub outdoor_temp: Option<f64>,
    /// Latest outdoor humidity.
    pub outdoor_humidity: Option<f64>,
    /// Latest outdoor weather code.
    pub weather_code: Option<u16>,
}

impl SensorFeatureVector {
    /// The rating counts as a [`FeedbackCounts`].
    #[must_use]
    pub fn feedback(&self) -> FeedbackCounts {
        FeedbackCounts { hot: self.feedback_hot, ok: self.feedback_ok, cold: self.feedback_cold }
    }
}

/// Aggregator with a configurable averaging window.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAggregator {
    window: Duration,
}

impl Default for FeatureAggregator {
    fn default() -> Self {
        Self::with_window_secs(AVERAGE_WINDOW_SECS)
    }
}

impl FeatureAggregator {
    /// Aggregator averaging over the trailing `secs` seconds. Windows longer
    /// than [`Duration::MAX`] saturate to it.
    #[must_use]
    pub fn with_window_secs(secs: u64) -> Self {
        Self { window: seconds_saturating(secs) }
    }

    /// Aggregator built from configuration.
    #[must_use]
    pub fn from_config(config: &AggregationConfig) -> Self {
        Self::with_window_secs(config.window_secs)
    }

    /// Builds one feature vector per sensor, in `sensors` order, as of `now`.
    #[must_use]
    pub fn aggregate(
        &self,
        now: DateTime<Utc>,
        sensors: &[Sensor],
        feedbacks: &[FeedbackRecord],
        live_temps: &HashMap<SensorId, f64>,
        historical_temps: &HistoricalTemps,
        outdoor_data: &[OutdoorCondition],
    ) -> Vec<SensorFeatureVector> {
        crate::time_scope!("features", format!("aggregate {} sensor(s)", sensors.len()));

        let counts = FeedbackCounts::per_sensor(feedbacks);
        let outdoor = OutdoorCondition::latest(outdoor_data);
        let cutoff = now.checked_sub_signed(self.window).unwrap_or(DateTime::<Utc>::MIN_UTC);

        sensors
            .iter()
            .map(|sensor| {
                let current_temp = live_temps.get(&sensor.id).copied();
                let (avg_temp_1h, avg_source) = trailing_average(
                    historical_temps.get(&sensor.id).map_or(&[][..], Vec::as_slice),
                    cutoff,
                    current_temp,
                );
                let fb = counts.get(&sensor.id).copied().unwrap_or_default();

                SensorFeatureVector {
                    sensor_id: sensor.id,
                    location: sensor.location.clone(),
                    timestamp: now,
                    current_temp,
                    avg_temp_1h,
                    avg_source,
                    feedback_hot: fb.hot,
                    feedback_ok: fb.ok,
                    feedback_cold: fb.cold,
                    total_feedback_count: fb.total(),
                    outdoor_temp: outdoor.map(|o| o.temperature),
                    outdoor_humidity: outdoor.map(|o| o.humidity),
                    weather_code: outdoor.map(|o| o.weather_code),
                }
            })
            .collect()
    }
}

fn trailing_average(
    history: &[(DateTime<Utc>, f64)],
    cutoff: DateTime<Utc>,
    live: Option<f64>,
) -> (f64, AverageSource) {
    let (sum, n) = history
        .iter()
        .filter(|(ts, _)| *ts >= cutoff)
        .fold((0.0, 0usize), |(sum, n), (_, t)| (sum + t, n + 1));

    if n > 0 {
        (sum / n as f64, AverageSource::Historical)
    } else if let Some(live) = live {
        (live, AverageSource::LiveFallback)
    } else {
        (DEFAULT_AVERAGE_TEMP, AverageSource::Default)
    }
}

/// Builds feature vectors with the default one-hour window, as of now.
#[must_use]
pub fn aggregate_sensor_features(
    sensors: &[Sensor],
    feedbacks: &[FeedbackRecord],
    live_temps: &HashMap<SensorId, f64>,
    historical_temps: &HistoricalTemps,
    outdoor_data: &[OutdoorCondition],
) -> Vec<SensorFeatureVector> {
    aggregate_sensor_features_at(
        Utc::now(),
        sensors,
        feedbacks,
        live_temps,
        historical_temps,
        outdoor_data,
    )
}

/// Same as [`aggregate_sensor_features`] with an explicit clock.
#[must_use]
pub fn aggregate_sensor_features_at(
    now: DateTime<Utc>,
    sensors: &[Sensor],
    feedbacks: &[FeedbackRecord],
    live_temps: &HashMap<SensorId, f64>,
    historical_temps: &HistoricalTemps,
    outdoor_data: &[OutdoorCondition],
) -> Vec<SensorFeatureVector> {
    FeatureAggregator::default().aggregate(
        now,
        sensors,
        feedbacks,
        live_temps,
        historical_temps,
        outdoor_data,
    )
}

/// Groups readings into the per-sensor history the aggregator consumes.
#[must_use]
pub fn historical_temps_from(readings: &[TemperatureReading]) -> HistoricalTemps {
    let mut history = HistoricalTemps::new();
    for r in readings {
        history.entry(r.sensor_id).or_default().push((r.timestamp, r.temperature));
    }
    history
}
