//! Placeholder "AI" summaries for the admin dashboard.

use crate::model::{FeedbackCounts, FeedbackRecord, Sensor, SensorStatus};

/// Prefix marking both summaries as placeholder output.
pub const SUMMARY_TAG: &str = "[Dummy AI]";

/// `"[Dummy AI] Total sensors: N; Online: A; Offline: B"`.
///
/// Sensors in an unknown status count toward the total only.
#[must_use]
pub fn summarize_sensors(sensors: &[Sensor]) -> String {
    let online = sensors.iter().filter(|s| s.status() == SensorStatus::Online).count();
    let offline = sensors.iter().filter(|s| s.status() == SensorStatus::Offline).count();
    format!(
        "{SUMMARY_TAG} Total sensors: {}; Online: {online}; Offline: {offline}",
        sensors.len()
    )
}

/// `"[Dummy AI] Total feedbacks: N; Hot: H; OK: O; Cold: C"`.
///
/// The total is every record, including unknown ratings.
#[must_use]
pub fn summarize_feedback(feedbacks: &[FeedbackRecord]) -> String {
    let counts = FeedbackCounts::overall(feedbacks);
    format!(
        "{SUMMARY_TAG} Total feedbacks: {}; Hot: {}; OK: {}; Cold: {}",
        feedbacks.len(),
        counts.hot,
        counts.ok,
        counts.cold
    )
}
