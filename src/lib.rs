//! # Campus IoT
//!
//! Sensor status notifications, telemetry aggregation and thermostat advice for
//! a campus monitoring dashboard.
//!
//! ## Features
//!
//! - **Status notifications**: a thread-safe observer registry that fans out
//!   sensor online/offline transitions, isolating failing observers
//! - **Feature aggregation**: per-sensor snapshots combining live and
//!   historical temperature, student feedback and outdoor weather
//! - **Thermostat advice**: a comfort-band rule producing one suggestion per
//!   room
//! - **Admin dashboard**: one serializable report composing all of the above
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use campus_iot::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(StatusRegistry::new());
//! registry.attach(Arc::new(StatusChangeLogger));
//!
//! let catalog = Arc::new(SensorCatalog::new(Arc::clone(&registry)));
//! catalog.seed_demo()?;
//! registry.attach(Arc::new(MaintenanceAlert::new(catalog.directory())));
//!
//! let dashboard = AdminDashboard::new(Arc::clone(&catalog), &Config::default());
//! catalog.toggle_status(SensorId(1))?;
//! let report = dashboard.build();
//! ```
//!
//! ## Feature Flags
//!
//! - `cli`: the `campus-dashboard` demo binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Sensors, feedback, telemetry and users.
pub mod model;

/// Status-change registry and observers.
pub mod notify;

/// In-memory catalog owning sensor status mutation.
pub mod catalog;

// ============================================================================
// Analysis Modules
// ============================================================================

/// Live telemetry simulator and demo weather.
pub mod telemetry;

/// Feature aggregation, thermostat advice and summaries.
pub mod analysis;

/// Admin dashboard report.
pub mod dashboard;

// ============================================================================
// Support Modules
// ============================================================================

/// YAML configuration.
pub mod config;

/// Operation timing on the `log` facade.
pub mod debug;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for campus IoT operations.
pub mod error;

pub use error::{CampusError, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use campus_iot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analysis::{
        aggregate_sensor_features, suggest_thermostat_adjustments, summarize_feedback,
        summarize_sensors, SensorFeatureVector, ThermostatAdvisor,
    };
    pub use crate::catalog::SensorCatalog;
    pub use crate::config::Config;
    pub use crate::dashboard::{AdminDashboard, DashboardReport};
    pub use crate::error::{CampusError, Result};
    pub use crate::model::{
        FeedbackRecord, Rating, Role, Sensor, SensorId, SensorStatus, StatusChangeEvent, User,
        UserId,
    };
    pub use crate::notify::{
        CalibrationScheduler, DashboardFeed, MaintenanceAlert, StatusChangeLogger, StatusObserver,
        StatusRegistry,
    };
    pub use crate::telemetry::{simulate_live_temperatures, TemperatureSimulator};
}
