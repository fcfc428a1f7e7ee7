//! Review sessions: a frozen selection of due shortcuts and the ratings the
//! learner reports back for them.

use super::{ItemStore, Rating, ReviewItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MAX_ITEMS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// 0 means no limit.
    pub max_items: u32,
    /// Lowest ease factor first instead of due order.
    pub focus_on_difficult: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            focus_on_difficult: false,
        }
    }
}

/// Snapshot of the shortcuts chosen for one sitting. Never re-queries the
/// store, so its contents stay fixed however long the review takes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    items: Vec<String>,
    config: SessionConfig,
}

impl ReviewSession {
    /// Picks up to `config.max_items` items due at `now` (all of them when
    /// `max_items` is 0). No due items gives an empty session.
    pub fn build(store: &ItemStore, config: SessionConfig, now: DateTime<Utc>) -> Self {
        let mut candidates: Vec<&ReviewItem> = store.all_due(now);
        if config.focus_on_difficult {
            // Stable, so equally difficult items stay in due order.
            candidates.sort_by(|a, b| a.ease_factor.total_cmp(&b.ease_factor));
        }
        if config.max_items > 0 {
            candidates.truncate(config.max_items as usize);
        }

        Self {
            id: Uuid::new_v4(),
            created_at: now,
            items: candidates.into_iter().map(|i| i.id.clone()).collect(),
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn contains(&self, shortcut_id: &str) -> bool {
        self.items.iter().any(|id| id == shortcut_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A learner's answer for one shortcut of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub shortcut_id: String,
    pub performance: Rating,
    pub response_time_ms: u32,
}

impl ReviewResult {
    pub fn new(shortcut_id: impl Into<String>, performance: Rating, response_time_ms: u32) -> Self {
        Self {
            shortcut_id: shortcut_id.into(),
            performance,
            response_time_ms,
        }
    }
}
