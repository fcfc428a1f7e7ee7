//! Summary numbers over the whole item store. Derived on demand, never stored.

use super::ItemStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_shortcuts: usize,
    pub due_shortcuts: usize,
    pub average_ease_factor: f64,
    /// 0-100
    pub mastery_level: f64,
}

impl Statistics {
    pub fn compute(store: &ItemStore, now: DateTime<Utc>) -> Self {
        let total = store.len();
        if total == 0 {
            return Self::default();
        }

        let cap = store.policy().mastery_repetitions.max(1);
        let mut due = 0;
        let mut ease_sum = 0.0;
        let mut mastery_sum = 0.0;
        for item in store.iter() {
            if item.is_due(now) {
                due += 1;
            }
            ease_sum += item.ease_factor;
            mastery_sum += f64::from(item.repetition_count.min(cap)) / f64::from(cap) * 100.0;
        }

        Self {
            total_shortcuts: total,
            due_shortcuts: due,
            average_ease_factor: ease_sum / total as f64,
            mastery_level: mastery_sum / total as f64,
        }
    }
}
