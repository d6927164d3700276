//! End-to-end status notification tests through the public catalog API.
//!
//! Run: cargo test --test notification_test

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use campus_iot::catalog::SensorCatalog;
use campus_iot::model::{SensorId, SensorStatus, StatusChangeEvent};
use campus_iot::notify::{
    CalibrationScheduler, DashboardFeed, FnObserver, MaintenanceAlert, SharedObserver,
    StatusObserver, StatusRegistry,
};
use campus_iot::CampusError;

/// Records every event it sees, tagged with its own label.
struct Tape {
    label: &'static str,
    log: Arc<Mutex<Vec<(&'static str, StatusChangeEvent)>>>,
}

impl StatusObserver for Tape {
    fn name(&self) -> &'static str {
        self.label
    }

    fn update(&self, event: &StatusChangeEvent) -> campus_iot::Result<()> {
        self.log.lock().unwrap().push((self.label, *event));
        Ok(())
    }
}

fn setup() -> (Arc<StatusRegistry>, Arc<SensorCatalog>) {
    let registry = Arc::new(StatusRegistry::new());
    let catalog = Arc::new(SensorCatalog::new(Arc::clone(&registry)));
    (registry, catalog)
}

#[test]
fn test_observers_called_once_in_attachment_order() {
    let (registry, catalog) = setup();
    let log = Arc::new(Mutex::new(Vec::new()));
    for label in ["first", "second", "third"] {
        registry.attach(Arc::new(Tape { label, log: Arc::clone(&log) }));
    }
    let id = catalog.add_sensor("Sensor A1", "Room 101", SensorStatus::Online).id;

    catalog.set_status(id, SensorStatus::Offline).unwrap();

    let expected = StatusChangeEvent {
        sensor_id: id,
        old_status: SensorStatus::Online,
        new_status: SensorStatus::Offline,
    };
    let seen = log.lock().unwrap().clone();
    assert_eq!(seen, vec![("first", expected), ("second", expected), ("third", expected)]);
}

#[test]
fn test_detached_observer_never_called_again() {
    let (registry, catalog) = setup();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let observer: SharedObserver = Arc::new(FnObserver::new("counter", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));
    registry.attach(Arc::clone(&observer));
    let id = catalog.add_sensor("Sensor A1", "Room 101", SensorStatus::Online).id;

    catalog.toggle_status(id).unwrap();
    assert!(registry.detach(&observer));
    for _ in 0..5 {
        catalog.toggle_status(id).unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failing_observer_does_not_block_others_or_the_mutation() {
    let (registry, catalog) = setup();
    registry.attach(Arc::new(FnObserver::new("broken", |_| {
        Err(CampusError::observer("broken", "mail relay unreachable"))
    })));
    registry.attach(Arc::new(FnObserver::new("panicky", |_| panic!("boom"))));
    let feed = Arc::new(DashboardFeed::default());
    registry.attach(feed.clone());
    let id = catalog.add_sensor("Sensor A1", "Room 101", SensorStatus::Online).id;

    let report = catalog.set_status(id, SensorStatus::Offline).unwrap().unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().any(|f| f.panicked));
    assert_eq!(catalog.sensor(id).unwrap().status(), SensorStatus::Offline);
    assert_eq!(feed.notifications().len(), 1);
}

#[test]
fn test_reference_observers_follow_transitions() {
    let (registry, catalog) = setup();
    let alert = Arc::new(MaintenanceAlert::new(catalog.directory()));
    let scheduler = Arc::new(CalibrationScheduler::new(catalog.directory()));
    registry.attach(alert.clone());
    registry.attach(scheduler.clone());
    catalog.seed_demo().unwrap();

    // A1 online -> offline, B2 offline -> online.
    catalog.toggle_status(SensorId(1)).unwrap();
    catalog.toggle_status(SensorId(2)).unwrap();

    let notices = alert.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].location, "Building 1 - Room 101");

    let requests = scheduler.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].sensor_name, "Sensor B2");
}

#[test]
fn test_concurrent_status_changes_all_delivered() {
    let (registry, catalog) = setup();
    let feed = Arc::new(DashboardFeed::new(1000));
    registry.attach(feed.clone());
    let ids: Vec<SensorId> = (0..8)
        .map(|i| {
            catalog.add_sensor(format!("S{i}"), format!("Room {i}"), SensorStatus::Online).id
        })
        .collect();

    std::thread::scope(|scope| {
        for &id in &ids {
            let catalog = Arc::clone(&catalog);
            scope.spawn(move || {
                for _ in 0..10 {
                    catalog.toggle_status(id).unwrap();
                }
            });
        }
    });

    assert_eq!(feed.notifications().len(), 80);
    assert!(catalog.sensors().iter().all(|s| s.status() == SensorStatus::Online));
}

fn status_strategy() -> impl Strategy<Value = SensorStatus> {
    prop_oneof![Just(SensorStatus::Online), Just(SensorStatus::Offline)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Observers fire exactly once per real transition and never on no-ops.
    #[test]
    fn prop_one_call_per_change(
        initial in status_strategy(),
        writes in prop::collection::vec(status_strategy(), 0..30),
    ) {
        let (registry, catalog) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.attach(Arc::new(FnObserver::new("counter", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })));
        let id = catalog.add_sensor("S", "Room", initial).id;

        let mut current = initial;
        let mut expected = 0;
        for status in writes {
            if status != current {
                expected += 1;
                current = status;
            }
            catalog.set_status(id, status).unwrap();
        }

        prop_assert_eq!(calls.load(Ordering::SeqCst), expected);
        prop_assert_eq!(catalog.sensor(id).unwrap().status(), current);
    }
}
