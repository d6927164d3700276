//! Error types for the campus IoT core.
//!
//! Missing data (no live reading, no history, no outdoor samples) is never an
//! error here; it resolves to documented defaults. What remains are lookups
//! against the catalog, observer failures and configuration problems.

use crate::model::{Role, SensorId, UserId};
use std::io;
use thiserror::Error;

/// Error type for campus IoT operations.
#[derive(Debug, Error)]
pub enum CampusError {
    /// No sensor with this id exists in the catalog.
    #[error("sensor {0} not found")]
    SensorNotFound(SensorId),

    /// No user with this id exists in the catalog.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// A status observer rejected an event.
    #[error("observer '{observer}' failed: {message}")]
    ObserverFailed {
        /// Name of the failing observer.
        observer: &'static str,
        /// Error message describing the failure.
        message: String,
    },

    /// The acting user lacks the role an operation requires.
    #[error("forbidden: {required} role required")]
    Forbidden {
        /// Role the operation requires.
        required: Role,
    },

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: String,
        /// Error message describing why the value is invalid.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CampusError {
    /// Convenience constructor for observer implementations.
    pub fn observer(observer: &'static str, message: impl Into<String>) -> Self {
        Self::ObserverFailed { observer, message: message.into() }
    }
}

/// Result type alias for campus IoT operations.
pub type Result<T> = std::result::Result<T, CampusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_not_found_includes_id() {
        let err = CampusError::SensorNotFound(SensorId(42));
        let display = err.to_string();

        assert!(display.contains("42"), "Error should include sensor id: {}", display);
    }

    #[test]
    fn test_observer_failed_includes_details() {
        let err = CampusError::ObserverFailed {
            observer: "maintenance_alert",
            message: "mail relay unreachable".to_string(),
        };
        let display = err.to_string();

        assert!(display.contains("maintenance_alert"));
        assert!(display.contains("mail relay"));
    }

    #[test]
    fn test_forbidden_names_role() {
        let err = CampusError::Forbidden { required: Role::Admin };
        assert!(err.to_string().contains("admin"));
    }

    #[test]
    fn test_config_parse_error_includes_line_number() {
        let err = CampusError::ConfigParse { line: 7, message: "invalid value".to_string() };
        let display = err.to_string();

        assert!(display.contains('7'), "Error should include line number: {}", display);
        assert!(display.contains("invalid value"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: CampusError = io_err.into();

        assert!(matches!(err, CampusError::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CampusError>();
    }
}
