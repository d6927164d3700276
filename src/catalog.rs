//! In-memory sensor catalog.
//!
//! Holds sensors, users, feedback, calibrations and telemetry behind
//! `RwLock`s, and owns the status-change entry point for stored sensors.
//! The catalog never holds one of its locks while the registry fans out, so
//! observers are free to read it back through [`SensorDirectory`].
//!
//! ```rust,ignore
//! use campus_iot::catalog::SensorCatalog;
//! use campus_iot::notify::{MaintenanceAlert, StatusRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(StatusRegistry::new());
//! let catalog = Arc::new(SensorCatalog::new(Arc::clone(&registry)));
//! registry.attach(Arc::new(MaintenanceAlert::new(catalog.directory())));
//! ```

use crate::error::{CampusError, Result};
use crate::model::{
    Calibration, FeedbackRecord, OutdoorCondition, Rating, Role, Sensor, SensorId, SensorStatus,
    TemperatureReading, User, UserId,
};
use crate::notify::{NotifyReport, SensorDirectory, StatusRegistry};
use crate::telemetry::demo_outdoor_conditions;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Thread-safe store for everything the dashboard reads.
pub struct SensorCatalog {
    registry: Arc<StatusRegistry>,
    sensors: RwLock<Vec<Sensor>>,
    users: RwLock<Vec<User>>,
    feedback: RwLock<Vec<FeedbackRecord>>,
    calibrations: RwLock<Vec<Calibration>>,
    readings: RwLock<Vec<TemperatureReading>>,
    outdoor: RwLock<Vec<OutdoorCondition>>,
    next_sensor_id: AtomicU32,
    next_user_id: AtomicU32,
}

impl std::fmt::Debug for SensorCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorCatalog")
            .field("sensors", &read(&self.sensors).len())
            .field("users", &read(&self.users).len())
            .field("feedback", &read(&self.feedback).len())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl SensorCatalog {
    /// Creates an empty catalog publishing status changes to `registry`.
    #[must_use]
    pub fn new(registry: Arc<StatusRegistry>) -> Self {
        Self {
            registry,
            sensors: RwLock::new(Vec::new()),
            users: RwLock::new(Vec::new()),
            feedback: RwLock::new(Vec::new()),
            calibrations: RwLock::new(Vec::new()),
            readings: RwLock::new(Vec::new()),
            outdoor: RwLock::new(Vec::new()),
            next_sensor_id: AtomicU32::new(1),
            next_user_id: AtomicU32::new(1),
        }
    }

    /// The registry status changes are published to.
    #[must_use]
    pub fn registry(&self) -> &Arc<StatusRegistry> {
        &self.registry
    }

    /// A directory handle for observers that does not keep the catalog alive.
    ///
    /// Observers live in the registry and the registry lives in the catalog;
    /// a strong handle here would form a cycle.
    #[must_use]
    pub fn directory(self: &Arc<Self>) -> Arc<dyn SensorDirectory> {
        Arc::new(Arc::downgrade(self))
    }

    // ========================================================================
    // Sensors
    // ========================================================================

    /// Adds a sensor with the next free id.
    pub fn add_sensor(
        &self,
        name: impl Into<String>,
        location: impl Into<String>,
        status: SensorStatus,
    ) -> Sensor {
        let id = self.next_sensor_id.fetch_add(1, Ordering::Relaxed);
        let sensor = Sensor::new(id, name, location, status);
        log::debug!("adding sensor {} '{}' at '{}'", sensor.id, sensor.name, sensor.location);
        write(&self.sensors).push(sensor.clone());
        sensor
    }

    /// Removes a sensor together with its calibrations and readings.
    ///
    /// Feedback about the sensor is kept; campus-wide totals still count it.
    ///
    /// # Errors
    ///
    /// Returns [`CampusError::SensorNotFound`] for an unknown id.
    pub fn remove_sensor(&self, id: SensorId) -> Result<Sensor> {
        let removed = {
            let mut sensors = write(&self.sensors);
            let idx = sensors
                .iter()
                .position(|s| s.id == id)
                .ok_or(CampusError::SensorNotFound(id))?;
            sensors.remove(idx)
        };
        write(&self.calibrations).retain(|c| c.sensor_id != id);
        write(&self.readings).retain(|r| r.sensor_id != id);
        log::info!("removed sensor {} '{}'", removed.id, removed.name);
        Ok(removed)
    }

    /// Snapshot of one sensor.
    #[must_use]
    pub fn sensor(&self, id: SensorId) -> Option<Sensor> {
        read(&self.sensors).iter().find(|s| s.id == id).cloned()
    }

    /// Snapshot of all sensors in insertion order.
    #[must_use]
    pub fn sensors(&self) -> Vec<Sensor> {
        read(&self.sensors).clone()
    }

    /// Sets a sensor's status and notifies observers if it changed.
    ///
    /// Returns `Ok(None)` when the status was already `status`.
    ///
    /// # Errors
    ///
    /// Returns [`CampusError::SensorNotFound`] for an unknown id.
    pub fn set_status(&self, id: SensorId, status: SensorStatus) -> Result<Option<NotifyReport>> {
        self.update_status(id, |_| status)
    }

    /// Flips online to offline and anything else to online.
    ///
    /// # Errors
    ///
    /// Returns [`CampusError::SensorNotFound`] for an unknown id.
    pub fn toggle_status(&self, id: SensorId) -> Result<Option<NotifyReport>> {
        self.update_status(id, SensorStatus::toggled)
    }

    fn update_status(
        &self,
        id: SensorId,
        next: impl FnOnce(&SensorStatus) -> SensorStatus,
    ) -> Result<Option<NotifyReport>> {
        let event = {
            let mut sensors = write(&self.sensors);
            let sensor =
                sensors.iter_mut().find(|s| s.id == id).ok_or(CampusError::SensorNotFound(id))?;
            let status = next(&sensor.status());
            sensor.apply_status(status)
        };
        Ok(event.map(|event| self.registry.publish(&event)))
    }

    // ========================================================================
    // Calibrations
    // ========================================================================

    /// Records a calibration event stamped now.
    ///
    /// # Errors
    ///
    /// Returns [`CampusError::SensorNotFound`] for an unknown id.
    pub fn record_calibration(
        &self,
        sensor_id: SensorId,
        notes: Option<String>,
    ) -> Result<Calibration> {
        self.require_sensor(sensor_id)?;
        let calibration = Calibration { sensor_id, calibrated_at: Utc::now(), notes };
        write(&self.calibrations).push(calibration.clone());
        Ok(calibration)
    }

    /// Calibrations of one sensor, oldest first.
    #[must_use]
    pub fn calibrations_for(&self, sensor_id: SensorId) -> Vec<Calibration> {
        read(&self.calibrations).iter().filter(|c| c.sensor_id == sensor_id).cloned().collect()
    }

    // ========================================================================
    // Users and feedback
    // ========================================================================

    /// Adds a user with the next free id.
    pub fn add_user(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> User {
        let id = UserId(self.next_user_id.fetch_add(1, Ordering::Relaxed));
        let user = User { id, username: username.into(), email: email.into(), role };
        write(&self.users).push(user.clone());
        user
    }

    /// Snapshot of one user.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<User> {
        read(&self.users).iter().find(|u| u.id == id).cloned()
    }

    /// Stores a student's rating for a sensor.
    ///
    /// # Errors
    ///
    /// Fails if the user or sensor is unknown, or the user is not a student.
    pub fn submit_feedback(
        &self,
        user_id: UserId,
        sensor_id: SensorId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<FeedbackRecord> {
        let user = self.user(user_id).ok_or(CampusError::UserNotFound(user_id))?;
        user.require_role(Role::Student)?;
        self.require_sensor(sensor_id)?;

        let mut record = FeedbackRecord::new(sensor_id, user_id, rating);
        record.comment = comment;
        log::debug!("feedback from {} on sensor {}: {}", user.username, sensor_id, rating);
        write(&self.feedback).push(record.clone());
        Ok(record)
    }

    /// Every feedback record, in submission order.
    #[must_use]
    pub fn feedback(&self) -> Vec<FeedbackRecord> {
        read(&self.feedback).clone()
    }

    // ========================================================================
    // Telemetry
    // ========================================================================

    /// Stores a historical temperature reading.
    ///
    /// # Errors
    ///
    /// Returns [`CampusError::SensorNotFound`] for an unknown sensor.
    pub fn record_reading(&self, reading: TemperatureReading) -> Result<()> {
        self.require_sensor(reading.sensor_id)?;
        write(&self.readings).push(reading);
        Ok(())
    }

    /// Readings taken at or after `cutoff`.
    #[must_use]
    pub fn readings_since(&self, cutoff: DateTime<Utc>) -> Vec<TemperatureReading> {
        read(&self.readings).iter().filter(|r| r.timestamp >= cutoff).cloned().collect()
    }

    /// Stores an outdoor weather sample.
    pub fn record_outdoor(&self, sample: OutdoorCondition) {
        write(&self.outdoor).push(sample);
    }

    /// Outdoor weather samples in the order they were recorded.
    #[must_use]
    pub fn outdoor(&self) -> Vec<OutdoorCondition> {
        read(&self.outdoor).clone()
    }

    // ========================================================================
    // Demo data
    // ========================================================================

    /// Fills an empty catalog with the demo campus.
    ///
    /// Returns `Ok(false)` without touching anything if sensors already exist.
    ///
    /// # Errors
    ///
    /// Only if the seeded records reference each other inconsistently.
    pub fn seed_demo(&self) -> Result<bool> {
        if !read(&self.sensors).is_empty() {
            log::debug!("catalog already populated, skipping demo seed");
            return Ok(false);
        }

        self.add_user("admin1", "admin1@campus.edu", Role::Admin);
        self.add_user("admin2", "admin2@campus.edu", Role::Admin);
        let student1 = self.add_user("student1", "s1@campus.edu", Role::Student);
        let student2 = self.add_user("student2", "s2@campus.edu", Role::Student);

        let a1 = self.add_sensor("Sensor A1", "Building 1 - Room 101", SensorStatus::Online);
        let b2 = self.add_sensor("Sensor B2", "Building 2 - Room 202", SensorStatus::Offline);
        self.add_sensor("Sensor C3", "Building 3 - Room 303", SensorStatus::Online);

        self.record_calibration(a1.id, Some("Initial setup calibration".to_string()))?;
        self.record_calibration(b2.id, Some("Routine check".to_string()))?;

        self.submit_feedback(student1.id, a1.id, Rating::Ok, Some("Room feels fine".into()))?;
        self.submit_feedback(student2.id, b2.id, Rating::Hot, Some("Too warm today".into()))?;

        for sample in demo_outdoor_conditions(Utc::now()) {
            self.record_outdoor(sample);
        }

        log::info!("seeded demo catalog");
        Ok(true)
    }

    fn require_sensor(&self, id: SensorId) -> Result<()> {
        if read(&self.sensors).iter().any(|s| s.id == id) {
            Ok(())
        } else {
            Err(CampusError::SensorNotFound(id))
        }
    }
}

impl SensorDirectory for SensorCatalog {
    fn lookup(&self, id: SensorId) -> Option<Sensor> {
        self.sensor(id)
    }
}

impl SensorDirectory for Weak<SensorCatalog> {
    fn lookup(&self, id: SensorId) -> Option<Sensor> {
        self.upgrade()?.sensor(id)
    }
}
