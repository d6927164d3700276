//! Sensor status-change notifications.
//!
//! A [`StatusRegistry`] is created once by the host application and handed to
//! whatever mutates sensor status (normally a [`crate::catalog::SensorCatalog`]).
//! Attached [`StatusObserver`]s are called synchronously, in attachment order,
//! on the thread that performed the mutation.
//!
//! ```rust,ignore
//! use campus_iot::notify::{StatusRegistry, StatusChangeLogger, DashboardFeed};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(StatusRegistry::new());
//! registry.attach(Arc::new(StatusChangeLogger));
//! let feed = Arc::new(DashboardFeed::default());
//! registry.attach(feed.clone());
//! ```

pub mod observers;
pub mod registry;
pub mod ring_buffer;

pub use observers::{
    CalibrationRequest, CalibrationScheduler, DashboardFeed, DashboardNotification,
    MaintenanceAlert, MaintenanceNotice, SensorDirectory, StatusChangeLogger,
};
pub use registry::{
    FnObserver, NotifyReport, ObserverFailure, SharedObserver, StatusObserver, StatusRegistry,
};
pub use ring_buffer::RingBuffer;
