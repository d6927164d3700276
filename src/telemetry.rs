//! Live telemetry simulator and demo weather data.
//!
//! Stands in for real sensor polling. The random source is injected so tests
//! can use a seeded [`StdRng`]; production seeds from OS entropy.

use crate::config::SimulatorConfig;
use crate::model::{OutdoorCondition, Sensor, SensorId};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Lowest simulated live temperature (°C).
pub const SIMULATED_MIN: f64 = 18.0;

/// Highest simulated live temperature (°C).
pub const SIMULATED_MAX: f64 = 26.0;

/// Rounds to one decimal place.
#[must_use]
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Draws one live temperature per sensor, uniform in [18.0, 26.0] °C and
/// rounded to one decimal.
pub fn simulate_live_temperatures<R: Rng>(
    sensors: &[Sensor],
    rng: &mut R,
) -> HashMap<SensorId, f64> {
    simulate_in_range(sensors, rng, SIMULATED_MIN, SIMULATED_MAX)
}

fn simulate_in_range<R: Rng>(
    sensors: &[Sensor],
    rng: &mut R,
    min: f64,
    max: f64,
) -> HashMap<SensorId, f64> {
    sensors.iter().map(|s| (s.id, round_tenth(rng.gen_range(min..=max)))).collect()
}

/// Stateful simulator owning its random source and range.
#[derive(Debug, Clone)]
pub struct TemperatureSimulator<R = StdRng> {
    rng: R,
    min: f64,
    max: f64,
}

impl TemperatureSimulator<StdRng> {
    /// Deterministic simulator for tests and reproducible demos.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Simulator seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Builds a simulator from configuration. A configured seed wins over entropy.
    #[must_use]
    pub fn from_config(config: &SimulatorConfig) -> Self {
        let base = match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        };
        base.with_range(config.min_temp, config.max_temp)
    }
}

impl<R: Rng> TemperatureSimulator<R> {
    /// Wraps an arbitrary random source with the default range.
    pub fn new(rng: R) -> Self {
        Self { rng, min: SIMULATED_MIN, max: SIMULATED_MAX }
    }

    /// Overrides the range. Bounds are swapped if given in the wrong order.
    /// A NaN or infinite bound leaves the current range in place.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        if !min.is_finite() || !max.is_finite() {
            log::warn!("ignoring non-finite simulator range [{min}, {max}]");
            return self;
        }
        self.min = min.min(max);
        self.max = max.max(min);
        self
    }

    /// The configured `(min, max)` range.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// One live temperature per sensor.
    pub fn simulate(&mut self, sensors: &[Sensor]) -> HashMap<SensorId, f64> {
        let temps = simulate_in_range(sensors, &mut self.rng, self.min, self.max);
        log::debug!("simulated live temperatures for {} sensor(s)", temps.len());
        temps
    }
}

/// Hard-coded outdoor weather series: three hourly samples ending at `now`.
#[must_use]
pub fn demo_outdoor_conditions(now: DateTime<Utc>) -> Vec<OutdoorCondition> {
    [(2, 14.5, 72.0, 3), (1, 15.2, 68.0, 2), (0, 16.0, 65.0, 1)]
        .into_iter()
        .map(|(hours_ago, temperature, humidity, weather_code)| OutdoorCondition {
            timestamp: now - Duration::hours(hours_ago),
            temperature,
            humidity,
            weather_code,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SensorStatus;

    fn sensors(n: u32) -> Vec<Sensor> {
        (1..=n)
            .map(|i| {
                Sensor::new(i, format!("Sensor {i}"), format!("Room {i}"), SensorStatus::Online)
            })
            .collect()
    }

    #[test]
    fn test_one_value_per_sensor_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let temps = simulate_live_temperatures(&sensors(20), &mut rng);

        assert_eq!(temps.len(), 20);
        for t in temps.values() {
            assert!((SIMULATED_MIN..=SIMULATED_MAX).contains(t), "{t} out of range");
            assert!((t * 10.0 - (t * 10.0).round()).abs() < 1e-9, "{t} not rounded");
        }
    }

    #[test]
    fn test_seeded_simulator_is_deterministic() {
        let roster = sensors(5);
        let a = TemperatureSimulator::seeded(7).simulate(&roster);
        let b = TemperatureSimulator::seeded(7).simulate(&roster);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_roster() {
        let mut sim = TemperatureSimulator::seeded(3);
        assert!(sim.simulate(&[]).is_empty());
    }

    #[test]
    fn test_with_range_orders_bounds() {
        let sim = TemperatureSimulator::seeded(0).with_range(30.0, 10.0);
        assert_eq!(sim.range(), (10.0, 30.0));
    }

    #[test]
    fn test_non_finite_range_is_ignored() {
        for (min, max) in [(f64::NAN, 30.0), (10.0, f64::INFINITY), (f64::NEG_INFINITY, f64::NAN)] {
            let mut sim = TemperatureSimulator::seeded(0).with_range(min, max);
            assert_eq!(sim.range(), (SIMULATED_MIN, SIMULATED_MAX));

            let temps = sim.simulate(&sensors(2));
            assert!(temps.values().all(|&t| (SIMULATED_MIN..=SIMULATED_MAX).contains(&t)));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut sim = TemperatureSimulator::seeded(0).with_range(21.0, 21.0);
        let temps = sim.simulate(&sensors(3));
        assert!(temps.values().all(|&t| t == 21.0));
    }

    #[test]
    fn test_from_config_uses_seed() {
        let config = SimulatorConfig { min_temp: 19.0, max_temp: 20.0, seed: Some(11) };
        let roster = sensors(4);
        let a = TemperatureSimulator::from_config(&config).simulate(&roster);
        let b = TemperatureSimulator::from_config(&config).simulate(&roster);

        assert_eq!(a, b);
        assert!(a.values().all(|t| (19.0..=20.0).contains(t)));
    }

    #[test]
    fn test_demo_outdoor_conditions_end_now() {
        let now = Utc::now();
        let samples = demo_outdoor_conditions(now);

        assert_eq!(samples.len(), 3);
        assert_eq!(OutdoorCondition::latest(&samples).map(|c| c.timestamp), Some(now));
    }

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(21.26), 21.3);
        assert_eq!(round_tenth(18.04), 18.0);
    }
}
