//! Status-change registry.
//!
//! Observers are kept in attachment order and deduplicated by identity (the
//! `Arc` allocation they live in). `notify` snapshots the list under the lock,
//! releases it, then calls each observer in turn, so observers may attach or
//! detach from inside `update` and concurrent callers never see a torn list.
//!
//! A failing observer, whether it returns an error or panics, is logged and
//! recorded in the [`NotifyReport`]; delivery continues with the next one.

use crate::error::Result;
use crate::model::{SensorId, SensorStatus, StatusChangeEvent};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Receives sensor status transitions.
///
/// Implementations must be `Send + Sync`: the registry is shared across
/// request handlers and may deliver from any of their threads.
pub trait StatusObserver: Send + Sync {
    /// Short identifier used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Handles one transition.
    ///
    /// # Errors
    ///
    /// An error is reported by the registry but never reaches the mutator.
    fn update(&self, event: &StatusChangeEvent) -> Result<()>;
}

/// A shared observer handle.
pub type SharedObserver = Arc<dyn StatusObserver>;

/// One observer that failed during a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    /// Name of the observer.
    pub observer: &'static str,
    /// What went wrong.
    pub message: String,
    /// True if the observer panicked rather than returning an error.
    pub panicked: bool,
}

/// Outcome of a single fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// Observers that handled the event successfully.
    pub delivered: usize,
    /// Observers that failed.
    pub failures: Vec<ObserverFailure>,
}

impl NotifyReport {
    /// Returns true if every observer succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total observers invoked.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

/// Publish/subscribe registry for sensor status transitions.
#[derive(Default)]
pub struct StatusRegistry {
    observers: Mutex<Vec<SharedObserver>>,
}

impl std::fmt::Debug for StatusRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&'static str> = self.lock().iter().map(|o| o.name()).collect();
        f.debug_struct("StatusRegistry").field("observers", &names).finish()
    }
}

impl StatusRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer. Returns false if this exact observer is already attached.
    pub fn attach(&self, observer: SharedObserver) -> bool {
        let mut observers = self.lock();
        if observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        log::debug!("attaching status observer '{}'", observer.name());
        observers.push(observer);
        true
    }

    /// Removes an observer. Returns false if it was not attached.
    pub fn detach(&self, observer: &SharedObserver) -> bool {
        let mut observers = self.lock();
        let before = observers.len();
        observers.retain(|o| !same_observer(o, observer));
        let removed = observers.len() != before;
        if removed {
            log::debug!("detached status observer '{}'", observer.name());
        }
        removed
    }

    /// Returns true if this exact observer is attached.
    #[must_use]
    pub fn contains(&self, observer: &SharedObserver) -> bool {
        self.lock().iter().any(|o| same_observer(o, observer))
    }

    /// Number of attached observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no observers are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Delivers a transition to every attached observer in attachment order.
    pub fn notify(
        &self,
        sensor_id: SensorId,
        old_status: SensorStatus,
        new_status: SensorStatus,
    ) -> NotifyReport {
        self.publish(&StatusChangeEvent { sensor_id, old_status, new_status })
    }

    /// Delivers an already-built event. See [`StatusRegistry::notify`].
    pub fn publish(&self, event: &StatusChangeEvent) -> NotifyReport {
        let snapshot: Vec<SharedObserver> = self.lock().clone();
        log::trace!(
            "sensor {} {} -> {}: notifying {} observer(s)",
            event.sensor_id,
            event.old_status,
            event.new_status,
            snapshot.len()
        );

        let mut report = NotifyReport::default();
        for observer in &snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer.update(event)));
            let failure = match outcome {
                Ok(Ok(())) => {
                    report.delivered += 1;
                    continue;
                }
                Ok(Err(err)) => ObserverFailure {
                    observer: observer.name(),
                    message: err.to_string(),
                    panicked: false,
                },
                Err(payload) => ObserverFailure {
                    observer: observer.name(),
                    message: panic_message(payload.as_ref()),
                    panicked: true,
                },
            };
            log::warn!(
                "status observer '{}' failed for sensor {}: {}",
                failure.observer,
                event.sensor_id,
                failure.message
            );
            report.failures.push(failure);
        }
        report
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SharedObserver>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Identity comparison on the allocation, ignoring vtable pointers.
fn same_observer(a: &SharedObserver, b: &SharedObserver) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "observer panicked".to_string()
    }
}

/// Closure-backed observer for simple cases.
pub struct FnObserver<F>
where
    F: Fn(&StatusChangeEvent) -> Result<()> + Send + Sync,
{
    name: &'static str,
    handler: F,
}

impl<F> FnObserver<F>
where
    F: Fn(&StatusChangeEvent) -> Result<()> + Send + Sync,
{
    /// Wraps `handler` under the given name.
    pub fn new(name: &'static str, handler: F) -> Self {
        Self { name, handler }
    }
}

impl<F> StatusObserver for FnObserver<F>
where
    F: Fn(&StatusChangeEvent) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn update(&self, event: &StatusChangeEvent) -> Result<()> {
        (self.handler)(event)
    }
}
