//! Thermostat advisor.
//!
//! A fixed-threshold rule per sensor, keyed by location:
//!
//! - warmer than `acceptable_high`, or more "hot" than "cold" ratings: lower by 1 °C
//! - otherwise colder than `acceptable_low`, or more "cold" than "hot": raise by 1 °C
//! - otherwise: within the comfortable range
//!
//! A sensor with no live temperature is judged on feedback alone and its
//! suggestion says so. Two sensors at the same location collide; the later
//! one in iteration order wins.

use super::features::SensorFeatureVector;
use crate::config::ThresholdConfig;
use crate::model::{FeedbackCounts, FeedbackRecord, Sensor, SensorId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Lower bound of the comfortable range (°C).
pub const ACCEPTABLE_LOW: f64 = 20.0;

/// Upper bound of the comfortable range (°C).
pub const ACCEPTABLE_HIGH: f64 = 24.0;

/// Suffix appended when no live temperature was available.
pub const FEEDBACK_ONLY_NOTE: &str = " (feedback only, no live reading)";

/// Direction of the suggested thermostat change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Lower the target by 1 °C.
    Lower,
    /// Raise the target by 1 °C.
    Raise,
    /// Leave the target alone.
    WithinRange,
}

impl Adjustment {
    /// Human-readable suggestion text.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Lower => "Consider lowering the thermostat by 1°C.",
            Self::Raise => "Consider raising the thermostat by 1°C.",
            Self::WithinRange => "Current settings are within the comfortable range.",
        }
    }
}

/// One sensor's advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// What to do.
    pub adjustment: Adjustment,
    /// False if the decision was made without a live temperature.
    pub had_live_reading: bool,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.adjustment.message())?;
        if !self.had_live_reading {
            f.write_str(FEEDBACK_ONLY_NOTE)?;
        }
        Ok(())
    }
}

/// Applies the comfort-band rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermostatAdvisor {
    low: f64,
    high: f64,
}

impl Default for ThermostatAdvisor {
    fn default() -> Self {
        Self { low: ACCEPTABLE_LOW, high: ACCEPTABLE_HIGH }
    }
}

impl ThermostatAdvisor {
    /// Advisor with a custom comfort band.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Advisor built from configuration.
    #[must_use]
    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self::new(config.acceptable_low, config.acceptable_high)
    }

    /// The `(low, high)` comfort band.
    #[must_use]
    pub fn band(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// Decides for one sensor.
    #[must_use]
    pub fn advise(&self, temp: Option<f64>, feedback: FeedbackCounts) -> Suggestion {
        let too_warm = temp.is_some_and(|t| t > self.high);
        let too_cold = temp.is_some_and(|t| t < self.low);

        let adjustment = if too_warm || feedback.hot > feedback.cold {
            Adjustment::Lower
        } else if too_cold || feedback.cold > feedback.hot {
            Adjustment::Raise
        } else {
            Adjustment::WithinRange
        };
        Suggestion { adjustment, had_live_reading: temp.is_some() }
    }

    /// Suggestion text per sensor location.
    #[must_use]
    pub fn suggest(
        &self,
        sensors: &[Sensor],
        feedbacks: &[FeedbackRecord],
        live_temps: &HashMap<SensorId, f64>,
    ) -> BTreeMap<String, String> {
        let counts = FeedbackCounts::per_sensor(feedbacks);
        sensors
            .iter()
            .map(|s| {
                let feedback = counts.get(&s.id).copied().unwrap_or_default();
                let suggestion = self.advise(live_temps.get(&s.id).copied(), feedback);
                (s.location.clone(), suggestion.to_string())
            })
            .collect()
    }

    /// Same rule applied to aggregated feature vectors.
    #[must_use]
    pub fn advise_features(&self, features: &[SensorFeatureVector]) -> BTreeMap<String, String> {
        features
            .iter()
            .map(|f| (f.location.clone(), self.advise(f.current_temp, f.feedback()).to_string()))
            .collect()
    }
}

/// Suggestion text per sensor location using the default comfort band.
#[must_use]
pub fn suggest_thermostat_adjustments(
    sensors: &[Sensor],
    feedbacks: &[FeedbackRecord],
    live_temps: &HashMap<SensorId, f64>,
) -> BTreeMap<String, String> {
    ThermostatAdvisor::default().suggest(sensors, feedbacks, live_temps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::aggregate_sensor_features;
    use crate::model::{Rating, SensorStatus, UserId};

    fn sensor(id: u32, location: &str) -> Sensor {
        Sensor::new(id, format!("Sensor {id}"), location, SensorStatus::Online)
    }

    fn feedback(sensor: u32, rating: Rating, n: usize) -> Vec<FeedbackRecord> {
        (0..n).map(|_| FeedbackRecord::new(SensorId(sensor), UserId(1), rating)).collect()
    }

    fn suggest_one(temp: Option<f64>, feedbacks: &[FeedbackRecord]) -> String {
        let live: HashMap<_, _> = temp.map(|t| (SensorId(1), t)).into_iter().collect();
        suggest_thermostat_adjustments(&[sensor(1, "Room 101")], feedbacks, &live)
            .remove("Room 101")
            .unwrap()
    }

    #[test]
    fn test_warm_room_is_lowered() {
        assert!(suggest_one(Some(25.0), &[]).contains("lowering"));
    }

    #[test]
    fn test_cold_room_is_raised() {
        assert!(suggest_one(Some(19.0), &[]).contains("raising"));
    }

    #[test]
    fn test_hot_feedback_overrides_mid_range_temp() {
        let feedbacks = feedback(1, Rating::Hot, 3);
        assert!(suggest_one(Some(22.0), &feedbacks).contains("lowering"));
    }

    #[test]
    fn test_cold_feedback_overrides_mid_range_temp() {
        let feedbacks = feedback(1, Rating::Cold, 2);
        assert!(suggest_one(Some(22.0), &feedbacks).contains("raising"));
    }

    #[test]
    fn test_mid_range_without_feedback_is_comfortable() {
        let text = suggest_one(Some(22.0), &[]);
        assert!(text.contains("within the comfortable range"));
        assert!(!text.contains(FEEDBACK_ONLY_NOTE));
    }

    #[test]
    fn test_tied_feedback_falls_through() {
        let mut feedbacks = feedback(1, Rating::Hot, 2);
        feedbacks.extend(feedback(1, Rating::Cold, 2));
        assert!(suggest_one(Some(21.0), &feedbacks).contains("within the comfortable range"));
    }

    #[test]
    fn test_boundaries_are_comfortable() {
        assert!(suggest_one(Some(ACCEPTABLE_LOW), &[]).contains("within"));
        assert!(suggest_one(Some(ACCEPTABLE_HIGH), &[]).contains("within"));
    }

    #[test]
    fn test_warm_temp_beats_cold_feedback() {
        let feedbacks = feedback(1, Rating::Cold, 5);
        assert!(suggest_one(Some(26.0), &feedbacks).contains("lowering"));
    }

    #[test]
    fn test_missing_temp_uses_feedback_only() {
        let text = suggest_one(None, &feedback(1, Rating::Hot, 1));
        assert!(text.contains("lowering"));
        assert!(text.ends_with(FEEDBACK_ONLY_NOTE));

        let text = suggest_one(None, &[]);
        assert!(text.contains("within the comfortable range"));
        assert!(text.ends_with(FEEDBACK_ONLY_NOTE));
    }

    #[test]
    fn test_location_collision_later_sensor_wins() {
        let sensors = vec![sensor(1, "Shared Hall"), sensor(2, "Shared Hall")];
        let live = HashMap::from([(SensorId(1), 30.0), (SensorId(2), 15.0)]);

        let suggestions = suggest_thermostat_adjustments(&sensors, &[], &live);

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions["Shared Hall"].contains("raising"));
    }

    #[test]
    fn test_custom_band() {
        let advisor = ThermostatAdvisor::new(18.0, 21.0);
        let s = advisor.advise(Some(22.0), FeedbackCounts::default());
        assert_eq!(s.adjustment, Adjustment::Lower);
        assert!(s.had_live_reading);
    }

    #[test]
    fn test_advise_features_matches_direct_rule() {
        let sensors = vec![sensor(1, "A"), sensor(2, "B"), sensor(3, "C")];
        let live = HashMap::from([(SensorId(1), 25.5), (SensorId(2), 21.0)]);
        let feedbacks = feedback(2, Rating::Cold, 1);

        let features = aggregate_sensor_features(
            &sensors,
            &feedbacks,
            &live,
            &HashMap::new(),
            &[],
        );
        let advisor = ThermostatAdvisor::default();

        assert_eq!(
            advisor.advise_features(&features),
            advisor.suggest(&sensors, &feedbacks, &live)
        );
    }
}
