use super::Rating;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scheduling state of one tracked shortcut.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: String,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetition_count: u32,
    pub due_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub last_performance: Option<Rating>,
    #[serde(default)]
    pub review_history: Vec<ReviewHistoryEntry>,
}

/// One applied rating, oldest first in `ReviewItem::review_history`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewHistoryEntry {
    pub reviewed_at: DateTime<Utc>,
    pub performance: Rating,
}

impl ReviewItem {
    /// A never-reviewed item, due immediately.
    pub fn new(id: impl Into<String>, initial_ease_factor: f64, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            ease_factor: initial_ease_factor,
            interval_days: 0,
            repetition_count: 0,
            due_at: now,
            last_reviewed_at: None,
            last_performance: None,
            review_history: Vec::new(),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}
