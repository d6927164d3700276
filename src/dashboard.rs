//! Admin dashboard report.
//!
//! [`AdminDashboard`] pulls a snapshot from the [`SensorCatalog`], simulates
//! live temperatures, aggregates features, asks the advisor for suggestions and
//! packages everything into one serializable [`DashboardReport`]. Nothing is
//! cached; every call recomputes from the catalog.

use crate::analysis::{
    historical_temps_from, summarize_feedback, summarize_sensors, FeatureAggregator,
    SensorFeatureVector, ThermostatAdvisor,
};
use crate::catalog::SensorCatalog;
use crate::config::Config;
use crate::error::Result;
use crate::model::{
    FeedbackCounts, FeedbackRecord, OutdoorCondition, Role, Sensor, SensorId, SensorStatus, User,
};
use crate::notify::{DashboardFeed, DashboardNotification};
use crate::telemetry::TemperatureSimulator;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Number of status changes shown on the dashboard.
pub const RECENT_NOTIFICATIONS: usize = 10;

/// Everything the admin dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
    /// Placeholder sensor summary line.
    pub sensor_summary: String,
    /// Placeholder feedback summary line.
    pub feedback_summary: String,
    /// All sensors.
    pub sensors: Vec<Sensor>,
    /// Sensors currently online.
    pub online_count: usize,
    /// Sensors currently offline.
    pub offline_count: usize,
    /// All feedback records.
    pub feedback: Vec<FeedbackRecord>,
    /// Campus-wide hot/ok/cold counts.
    pub feedback_totals: FeedbackCounts,
    /// Per-sensor counts for the table badges; every sensor has an entry.
    pub feedback_badges: BTreeMap<SensorId, FeedbackCounts>,
    /// Simulated live temperature per sensor.
    pub live_temps: BTreeMap<SensorId, f64>,
    /// Thermostat suggestion per location.
    pub suggestions: BTreeMap<String, String>,
    /// One feature vector per sensor.
    pub feature_vectors: Vec<SensorFeatureVector>,
    /// Outdoor weather samples.
    pub outdoor_data: Vec<OutdoorCondition>,
    /// Temperature of the chronologically latest outdoor sample.
    pub latest_outdoor_temp: Option<f64>,
    /// Comfort band `(low, high)` for colouring.
    pub comfort_band: (f64, f64),
    /// Most recent status changes, oldest first.
    pub recent_notifications: Vec<DashboardNotification>,
}

/// Builds [`DashboardReport`]s from a catalog.
pub struct AdminDashboard {
    catalog: Arc<SensorCatalog>,
    feed: Arc<DashboardFeed>,
    simulator: Mutex<TemperatureSimulator>,
    aggregator: FeatureAggregator,
    advisor: ThermostatAdvisor,
    history: Duration,
}

impl std::fmt::Debug for AdminDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDashboard")
            .field("catalog", &self.catalog)
            .field("aggregator", &self.aggregator)
            .field("advisor", &self.advisor)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl AdminDashboard {
    /// Creates a dashboard and attaches its notification feed to the catalog's
    /// registry.
    #[must_use]
    pub fn new(catalog: Arc<SensorCatalog>, config: &Config) -> Self {
        let feed = Arc::new(DashboardFeed::new(config.notifications.feed_capacity));
        catalog.registry().attach(feed.clone());

        Self {
            catalog,
            feed,
            simulator: Mutex::new(TemperatureSimulator::from_config(&config.simulator)),
            aggregator: FeatureAggregator::from_config(&config.aggregation),
            advisor: ThermostatAdvisor::from_config(&config.thresholds),
            history: config.history_lookback(),
        }
    }

    /// Replaces the live-temperature simulator.
    #[must_use]
    pub fn with_simulator(mut self, simulator: TemperatureSimulator) -> Self {
        self.simulator = Mutex::new(simulator);
        self
    }

    /// The notification feed attached to the registry.
    #[must_use]
    pub fn feed(&self) -> &Arc<DashboardFeed> {
        &self.feed
    }

    /// Builds the report for an admin viewer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CampusError::Forbidden`] unless `viewer` is an admin.
    pub fn build_for(&self, viewer: &User) -> Result<DashboardReport> {
        viewer.require_role(Role::Admin)?;
        Ok(self.build())
    }

    /// Builds the report as of now.
    #[must_use]
    pub fn build(&self) -> DashboardReport {
        self.build_at(Utc::now())
    }

    /// Builds the report as of `now`.
    #[must_use]
    pub fn build_at(&self, now: DateTime<Utc>) -> DashboardReport {
        crate::time_scope!("dashboard", "build report");

        let sensors = self.catalog.sensors();
        let feedback = self.catalog.feedback();
        let outdoor_data = self.catalog.outdoor();

        let cutoff = now.checked_sub_signed(self.history).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let historical = historical_temps_from(&self.catalog.readings_since(cutoff));

        let live_temps = self
            .simulator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .simulate(&sensors);

        let feature_vectors = self.aggregator.aggregate(
            now,
            &sensors,
            &feedback,
            &live_temps,
            &historical,
            &outdoor_data,
        );
        let suggestions = self.advisor.suggest(&sensors, &feedback, &live_temps);

        let per_sensor = FeedbackCounts::per_sensor(&feedback);
        let feedback_badges = sensors
            .iter()
            .map(|s| (s.id, per_sensor.get(&s.id).copied().unwrap_or_default()))
            .collect();

        let count_status =
            |status: SensorStatus| sensors.iter().filter(|s| s.status() == status).count();

        DashboardReport {
            generated_at: now,
            sensor_summary: summarize_sensors(&sensors),
            feedback_summary: summarize_feedback(&feedback),
            online_count: count_status(SensorStatus::Online),
            offline_count: count_status(SensorStatus::Offline),
            feedback_totals: FeedbackCounts::overall(&feedback),
            feedback_badges,
            live_temps: live_temps.into_iter().collect(),
            suggestions,
            feature_vectors,
            latest_outdoor_temp: OutdoorCondition::latest(&outdoor_data).map(|o| o.temperature),
            outdoor_data,
            comfort_band: self.advisor.band(),
            recent_notifications: self.feed.recent(RECENT_NOTIFICATIONS),
            sensors,
            feedback,
        }
    }
}
