//! Student temperature feedback.

use super::sensor::SensorId;
use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How a room feels to the student submitting feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Too warm.
    Hot,
    /// Comfortable.
    Ok,
    /// Too cold.
    Cold,
    /// Unrecognised rating; never counted in any bucket.
    #[serde(other)]
    Unknown,
}

impl Rating {
    /// Returns the lowercase wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Ok => "ok",
            Self::Cold => "cold",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Self::Hot,
            "ok" => Self::Ok,
            "cold" => Self::Cold,
            _ => Self::Unknown,
        })
    }
}

/// One feedback submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Sensor (room) the feedback is about.
    pub sensor_id: SensorId,
    /// Submitting user.
    pub user_id: UserId,
    /// The rating.
    pub rating: Rating,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Creates a feedback record stamped with the current time.
    #[must_use]
    pub fn new(sensor_id: SensorId, user_id: UserId, rating: Rating) -> Self {
        Self { sensor_id, user_id, rating, comment: None, submitted_at: Utc::now() }
    }

    /// Attaches a comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Overrides the submission time.
    #[must_use]
    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = at;
        self
    }
}

/// Hot/ok/cold counts for one sensor or for the whole campus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCounts {
    /// Number of "hot" ratings.
    pub hot: usize,
    /// Number of "ok" ratings.
    pub ok: usize,
    /// Number of "cold" ratings.
    pub cold: usize,
}

impl FeedbackCounts {
    /// Adds one rating. Unknown ratings are ignored.
    pub fn record(&mut self, rating: Rating) {
        match rating {
            Rating::Hot => self.hot += 1,
            Rating::Ok => self.ok += 1,
            Rating::Cold => self.cold += 1,
            Rating::Unknown => {}
        }
    }

    /// Sum of the three buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.hot + self.ok + self.cold
    }

    /// Counts every record regardless of sensor.
    #[must_use]
    pub fn overall<'a>(feedbacks: impl IntoIterator<Item = &'a FeedbackRecord>) -> Self {
        let mut counts = Self::default();
        for fb in feedbacks {
            counts.record(fb.rating);
        }
        counts
    }

    /// Counts ratings per sensor id.
    #[must_use]
    pub fn per_sensor<'a>(
        feedbacks: impl IntoIterator<Item = &'a FeedbackRecord>,
    ) -> HashMap<SensorId, Self> {
        let mut counts: HashMap<SensorId, Self> = HashMap::new();
        for fb in feedbacks {
            counts.entry(fb.sensor_id).or_default().record(fb.rating);
        }
        counts
    }
}
