//! Reference status observers.
//!
//! - [`StatusChangeLogger`]: logs every transition
//! - [`MaintenanceAlert`]: raises an alert when a sensor goes offline
//! - [`CalibrationScheduler`]: requests calibration when a sensor comes back
//! - [`DashboardFeed`]: keeps a bounded history for the admin dashboard
//!
//! Observers share no state with each other. The alert and scheduler resolve
//! sensor details at fire time through a [`SensorDirectory`], so they see the
//! current name and location rather than whatever was true when the event was
//! built. A sensor that has disappeared in the meantime is skipped.

use super::registry::StatusObserver;
use super::ring_buffer::RingBuffer;
use crate::error::Result;
use crate::model::{Sensor, SensorId, SensorStatus, StatusChangeEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Read access to the current sensor roster.
pub trait SensorDirectory: Send + Sync {
    /// Returns the sensor as it is right now, if it still exists.
    fn lookup(&self, id: SensorId) -> Option<Sensor>;
}

impl SensorDirectory for Vec<Sensor> {
    fn lookup(&self, id: SensorId) -> Option<Sensor> {
        self.iter().find(|s| s.id == id).cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Logger
// ============================================================================

/// Logs every status transition at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusChangeLogger;

impl StatusObserver for StatusChangeLogger {
    fn name(&self) -> &'static str {
        "status_logger"
    }

    fn update(&self, event: &StatusChangeEvent) -> Result<()> {
        log::info!(
            "Sensor {} changed from {} to {}",
            event.sensor_id,
            event.old_status,
            event.new_status
        );
        Ok(())
    }
}

// ============================================================================
// Maintenance alert
// ============================================================================

/// An alert raised for a sensor that went offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceNotice {
    /// Sensor that went offline.
    pub sensor_id: SensorId,
    /// Sensor name at the time of the alert.
    pub name: String,
    /// Sensor location at the time of the alert.
    pub location: String,
    /// When the alert was raised.
    pub raised_at: DateTime<Utc>,
}

impl MaintenanceNotice {
    /// Human-readable alert text.
    #[must_use]
    pub fn message(&self) -> String {
        format!("ALERT: Sensor {} at {} is now offline!", self.name, self.location)
    }
}

/// Raises a [`MaintenanceNotice`] whenever a sensor goes offline.
pub struct MaintenanceAlert {
    directory: Arc<dyn SensorDirectory>,
    notices: Mutex<Vec<MaintenanceNotice>>,
}

impl MaintenanceAlert {
    /// Creates an alert observer resolving sensors through `directory`.
    pub fn new(directory: Arc<dyn SensorDirectory>) -> Self {
        Self { directory, notices: Mutex::new(Vec::new()) }
    }

    /// Alerts raised so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<MaintenanceNotice> {
        lock(&self.notices).clone()
    }
}

impl std::fmt::Debug for MaintenanceAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceAlert").field("notices", &lock(&self.notices).len()).finish()
    }
}

impl StatusObserver for MaintenanceAlert {
    fn name(&self) -> &'static str {
        "maintenance_alert"
    }

    fn update(&self, event: &StatusChangeEvent) -> Result<()> {
        if !event.went_offline() {
            return Ok(());
        }
        let Some(sensor) = self.directory.lookup(event.sensor_id) else {
            log::warn!("sensor {} went offline but is no longer in the catalog", event.sensor_id);
            return Ok(());
        };

        let notice = MaintenanceNotice {
            sensor_id: sensor.id,
            name: sensor.name,
            location: sensor.location,
            raised_at: Utc::now(),
        };
        log::warn!("{}", notice.message());
        lock(&self.notices).push(notice);
        Ok(())
    }
}

// ============================================================================
// Calibration scheduler
// ============================================================================

/// A calibration request for a sensor that came back online.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRequest {
    /// Sensor to calibrate.
    pub sensor_id: SensorId,
    /// Sensor name at the time of the request.
    pub sensor_name: String,
    /// When the request was made.
    pub requested_at: DateTime<Utc>,
}

/// Schedules calibration on the `offline -> online` transition only.
pub struct CalibrationScheduler {
    directory: Arc<dyn SensorDirectory>,
    requests: Mutex<Vec<CalibrationRequest>>,
}

impl CalibrationScheduler {
    /// Creates a scheduler resolving sensors through `directory`.
    pub fn new(directory: Arc<dyn SensorDirectory>) -> Self {
        Self { directory, requests: Mutex::new(Vec::new()) }
    }

    /// Requests made so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<CalibrationRequest> {
        lock(&self.requests).clone()
    }
}

impl std::fmt::Debug for CalibrationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationScheduler")
            .field("requests", &lock(&self.requests).len())
            .finish()
    }
}

impl StatusObserver for CalibrationScheduler {
    fn name(&self) -> &'static str {
        "calibration_scheduler"
    }

    fn update(&self, event: &StatusChangeEvent) -> Result<()> {
        if !event.came_back_online() {
            return Ok(());
        }
        let Some(sensor) = self.directory.lookup(event.sensor_id) else {
            log::warn!(
                "sensor {} came back online but is no longer in the catalog",
                event.sensor_id
            );
            return Ok(());
        };

        log::info!("Scheduling calibration for sensor {}", sensor.name);
        lock(&self.requests).push(CalibrationRequest {
            sensor_id: sensor.id,
            sensor_name: sensor.name,
            requested_at: Utc::now(),
        });
        Ok(())
    }
}

// ============================================================================
// Dashboard feed
// ============================================================================

/// One status change as shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardNotification {
    /// Sensor whose status changed.
    pub sensor_id: SensorId,
    /// Status before the change.
    pub old_status: SensorStatus,
    /// Status after the change.
    pub new_status: SensorStatus,
    /// When the change was observed.
    pub timestamp: DateTime<Utc>,
}

/// Records every transition into a bounded history.
#[derive(Debug)]
pub struct DashboardFeed {
    history: Mutex<RingBuffer<DashboardNotification>>,
}

impl DashboardFeed {
    /// Default number of notifications retained.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates a feed keeping at most `capacity` notifications (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { history: Mutex::new(RingBuffer::new(capacity)) }
    }

    /// Copy of the retained notifications, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<DashboardNotification> {
        lock(&self.history).snapshot()
    }

    /// The most recent `n` notifications, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<DashboardNotification> {
        lock(&self.history).recent(n)
    }
}

impl Default for DashboardFeed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl StatusObserver for DashboardFeed {
    fn name(&self) -> &'static str {
        "dashboard_feed"
    }

    fn update(&self, event: &StatusChangeEvent) -> Result<()> {
        lock(&self.history).push(DashboardNotification {
            sensor_id: event.sensor_id,
            old_status: event.old_status,
            new_status: event.new_status,
            timestamp: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Arc<dyn SensorDirectory> {
        Arc::new(vec![
            Sensor::new(1, "Sensor A1", "Building 1 - Room 101", SensorStatus::Offline),
            Sensor::new(2, "Sensor B2", "Building 2 - Room 202", SensorStatus::Online),
        ])
    }

    fn event(id: u32, old: SensorStatus, new: SensorStatus) -> StatusChangeEvent {
        StatusChangeEvent { sensor_id: SensorId(id), old_status: old, new_status: new }
    }

    #[test]
    fn test_logger_accepts_every_event() {
        let logger = StatusChangeLogger;
        assert!(logger.update(&event(1, SensorStatus::Online, SensorStatus::Offline)).is_ok());
        assert!(logger.update(&event(1, SensorStatus::Offline, SensorStatus::Online)).is_ok());
    }

    #[test]
    fn test_maintenance_alert_fires_on_offline_only() {
        let alert = MaintenanceAlert::new(directory());

        alert.update(&event(2, SensorStatus::Offline, SensorStatus::Online)).unwrap();
        assert!(alert.notices().is_empty());

        alert.update(&event(1, SensorStatus::Online, SensorStatus::Offline)).unwrap();
        let notices = alert.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].name, "Sensor A1");
        assert_eq!(
            notices[0].message(),
            "ALERT: Sensor Sensor A1 at Building 1 - Room 101 is now offline!"
        );
    }

    #[test]
    fn test_maintenance_alert_handles_missing_sensor() {
        let alert = MaintenanceAlert::new(directory());

        let result = alert.update(&event(99, SensorStatus::Online, SensorStatus::Offline));

        assert!(result.is_ok());
        assert!(alert.notices().is_empty());
    }

    #[test]
    fn test_calibration_scheduler_fires_on_offline_to_online_only() {
        let scheduler = CalibrationScheduler::new(directory());

        scheduler.update(&event(1, SensorStatus::Unknown, SensorStatus::Online)).unwrap();
        scheduler.update(&event(1, SensorStatus::Online, SensorStatus::Offline)).unwrap();
        assert!(scheduler.requests().is_empty());

        scheduler.update(&event(1, SensorStatus::Offline, SensorStatus::Online)).unwrap();
        let requests = scheduler.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].sensor_name, "Sensor A1");
    }

    #[test]
    fn test_calibration_scheduler_handles_missing_sensor() {
        let scheduler = CalibrationScheduler::new(directory());
        assert!(scheduler.update(&event(42, SensorStatus::Offline, SensorStatus::Online)).is_ok());
        assert!(scheduler.requests().is_empty());
    }

    #[test]
    fn test_dashboard_feed_is_bounded() {
        let feed = DashboardFeed::new(2);
        feed.update(&event(1, SensorStatus::Online, SensorStatus::Offline)).unwrap();
        feed.update(&event(2, SensorStatus::Online, SensorStatus::Offline)).unwrap();
        feed.update(&event(3, SensorStatus::Offline, SensorStatus::Online)).unwrap();

        let ids: Vec<_> = feed.notifications().iter().map(|n| n.sensor_id).collect();
        assert_eq!(ids, vec![SensorId(2), SensorId(3)]);
        assert_eq!(feed.recent(1)[0].new_status, SensorStatus::Online);
    }

    #[test]
    fn test_dashboard_feed_zero_capacity_clamped() {
        let feed = DashboardFeed::new(0);
        feed.update(&event(1, SensorStatus::Online, SensorStatus::Offline)).unwrap();
        assert_eq!(feed.notifications().len(), 1);
    }
}
