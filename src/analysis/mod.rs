//! Analysis over the current sensor, feedback and telemetry snapshot.
//!
//! Everything here is a pure function of its inputs (plus the clock for
//! feature timestamps). Nothing is cached between dashboard requests.

pub mod advisor;
pub mod features;
pub mod summary;

pub use advisor::{
    suggest_thermostat_adjustments, Adjustment, Suggestion, ThermostatAdvisor, ACCEPTABLE_HIGH,
    ACCEPTABLE_LOW,
};
pub use features::{
    aggregate_sensor_features, aggregate_sensor_features_at, historical_temps_from,
    AverageSource, FeatureAggregator, HistoricalTemps, SensorFeatureVector,
};
pub use summary::{summarize_feedback, summarize_sensors, SUMMARY_TAG};
