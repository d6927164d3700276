//! Data model shared by the notification and analysis layers.
//!
//! - [`Sensor`]: a room sensor with an online/offline status
//! - [`FeedbackRecord`]: a student's hot/ok/cold rating for a sensor
//! - [`TemperatureReading`] and [`OutdoorCondition`]: telemetry inputs
//! - [`Calibration`] and [`User`]: administrative records
//!
//! Every type is `serde`-serializable so the surrounding web layer can render
//! or persist it directly.

pub mod feedback;
pub mod reading;
pub mod sensor;
pub mod user;

pub use feedback::{FeedbackCounts, FeedbackRecord, Rating};
pub use reading::{Calibration, OutdoorCondition, TemperatureReading};
pub use sensor::{Sensor, SensorId, SensorStatus, StatusChangeEvent};
pub use user::{Role, User, UserId};
