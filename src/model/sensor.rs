//! Sensor identity and status.

use crate::notify::{NotifyReport, StatusRegistry};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opaque sensor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(pub u32);

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SensorId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Connectivity status of a sensor.
///
/// `Unknown` absorbs values the outer validation layer let through; the core
/// never produces it and counters simply skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    /// Reporting normally.
    Online,
    /// Not reporting.
    Offline,
    /// Unrecognised status value.
    #[serde(other)]
    Unknown,
}

impl SensorStatus {
    /// Returns the lowercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the status an admin "toggle" moves to.
    ///
    /// Anything that is not online becomes online.
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Online => Self::Offline,
            Self::Offline | Self::Unknown => Self::Online,
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "online" => Self::Online,
            "offline" => Self::Offline,
            _ => Self::Unknown,
        })
    }
}

/// A status transition passed from the mutator to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    /// Sensor whose status changed.
    pub sensor_id: SensorId,
    /// Status before the change.
    pub old_status: SensorStatus,
    /// Status after the change.
    pub new_status: SensorStatus,
}

impl StatusChangeEvent {
    /// Returns true if the sensor just went offline.
    #[must_use]
    pub fn went_offline(&self) -> bool {
        self.new_status == SensorStatus::Offline
    }

    /// Returns true if the sensor just came back from offline.
    #[must_use]
    pub fn came_back_online(&self) -> bool {
        self.old_status == SensorStatus::Offline && self.new_status == SensorStatus::Online
    }
}

/// A simulated sensor installed in a campus room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Sensor id.
    pub id: SensorId,
    /// Display name (e.g. "Sensor A1").
    pub name: String,
    /// Room location, used as the key for thermostat suggestions.
    pub location: String,
    status: SensorStatus,
}

impl Sensor {
    /// Creates a sensor with the given initial status.
    #[must_use]
    pub fn new(
        id: impl Into<SensorId>,
        name: impl Into<String>,
        location: impl Into<String>,
        status: SensorStatus,
    ) -> Self {
        Self { id: id.into(), name: name.into(), location: location.into(), status }
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> SensorStatus {
        self.status
    }

    /// Returns true if the sensor is online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status == SensorStatus::Online
    }

    /// Sets the status and notifies `registry` if it actually changed.
    ///
    /// Returns the delivery report, or `None` for a no-op transition.
    pub fn set_status(
        &mut self,
        new_status: SensorStatus,
        registry: &StatusRegistry,
    ) -> Option<NotifyReport> {
        self.apply_status(new_status).map(|event| registry.publish(&event))
    }

    /// Stores `new_status` and returns the transition, if there was one.
    ///
    /// Every status write in the crate goes through here.
    pub(crate) fn apply_status(&mut self, new_status: SensorStatus) -> Option<StatusChangeEvent> {
        if self.status == new_status {
            return None;
        }
        let event =
            StatusChangeEvent { sensor_id: self.id, old_status: self.status, new_status };
        self.status = new_status;
        Some(event)
    }
}
