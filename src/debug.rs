//! Operation timing on top of the `log` facade.
//!
//! The crate logs through `log::{trace, debug, info, warn}`; the host picks
//! the backend (`env_logger` in the demo binary). [`TimingGuard`] adds
//! entry/exit trace lines with elapsed time around an operation.

use std::time::Instant;

/// Log target used by timing guards.
pub const TIMING_TARGET: &str = "campus_iot::timing";

/// RAII guard for timing a scope.
///
/// Emits `-> operation` on creation and `<- operation (N.NNms)` on drop, both
/// at `trace` level. When trace logging is disabled the guard costs one
/// `Instant::now()`.
#[derive(Debug)]
pub struct TimingGuard {
    component: &'static str,
    operation: String,
    start: Instant,
}

impl TimingGuard {
    /// Creates a new timing guard.
    pub fn new(component: &'static str, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        log::trace!(target: TIMING_TARGET, "[{component}] -> {operation}");
        Self { component, operation, start: Instant::now() }
    }

    /// Milliseconds since the guard was created.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        log::trace!(
            target: TIMING_TARGET,
            "[{}] <- {} ({:.2}ms)",
            self.component,
            self.operation,
            self.elapsed_ms()
        );
    }
}

/// Creates a timing guard for the rest of the enclosing scope.
#[macro_export]
macro_rules! time_scope {
    ($component:expr, $operation:expr) => {
        let _guard = $crate::debug::TimingGuard::new($component, $operation);
    };
}
