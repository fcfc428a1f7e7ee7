//! Authoritative map from shortcut id to its scheduling state.

use super::sm2::{SchedulingPolicy, calculate_next_review};
use super::{Rating, ReviewItem};
use crate::error::{Result, ReviewError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

const MAX_ID_LEN: usize = 256;

#[derive(Clone, Debug, Default)]
pub struct ItemStore {
    items: HashMap<String, ReviewItem>,
    policy: SchedulingPolicy,
}

impl ItemStore {
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self {
            items: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Starts tracking every id not already tracked. Existing entries are left
    /// untouched. All ids are validated before any is inserted, so one bad id
    /// leaves the store unchanged.
    ///
    /// Returns the newly created items, in input order.
    pub fn initialize<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewItem>> {
        for id in ids {
            validate_id(id.as_ref())?;
        }

        let mut created = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if self.items.contains_key(id) {
                continue;
            }
            let item = ReviewItem::new(id, self.policy.initial_ease_factor, now);
            self.items.insert(id.to_string(), item.clone());
            created.push(item);
        }
        Ok(created)
    }

    pub fn get(&self, id: &str) -> Result<&ReviewItem> {
        self.items
            .get(id)
            .ok_or_else(|| ReviewError::UnknownItem(id.to_string()))
    }

    /// Items with `due_at <= now`, oldest due first; among equally due items
    /// the lowest ease factor comes first.
    pub fn all_due(&self, now: DateTime<Utc>) -> Vec<&ReviewItem> {
        let mut due: Vec<&ReviewItem> = self.items.values().filter(|i| i.is_due(now)).collect();
        due.sort_by(|a, b| {
            a.due_at
                .cmp(&b.due_at)
                .then(a.ease_factor.total_cmp(&b.ease_factor))
                .then_with(|| a.id.cmp(&b.id))
        });
        due
    }

    /// Schedules `id` from `rating` at `now` and stores the result.
    pub fn apply(&mut self, id: &str, rating: Rating, now: DateTime<Utc>) -> Result<&ReviewItem> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| ReviewError::UnknownItem(id.to_string()))?;
        *item = calculate_next_review(item, rating, now, &self.policy);
        Ok(&*item)
    }

    /// Same as `apply` for a rating token that has not been parsed yet.
    pub fn apply_token(&mut self, id: &str, token: &str, now: DateTime<Utc>) -> Result<&ReviewItem> {
        if !self.items.contains_key(id) {
            return Err(ReviewError::UnknownItem(id.to_string()));
        }
        let rating = Rating::parse(token)?;
        self.apply(id, rating, now)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.values()
    }

    /// Every record, sorted by id.
    pub fn snapshot(&self) -> Vec<ReviewItem> {
        let mut items: Vec<ReviewItem> = self.items.values().cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }

    /// Replaces the whole store. A repeated id keeps its last record.
    pub fn replace_all(&mut self, items: Vec<ReviewItem>) {
        self.items = items.into_iter().map(|i| (i.id.clone(), i)).collect();
    }
}

/// Rejects empty ids, ids with surrounding whitespace or control characters,
/// and ids longer than `MAX_ID_LEN` bytes.
pub fn validate_id(id: &str) -> Result<()> {
    let malformed = id.is_empty()
        || id.len() > MAX_ID_LEN
        || id.trim() != id
        || id.chars().any(char::is_control);
    if malformed {
        return Err(ReviewError::InvalidId(id.to_string()));
    }
    Ok(())
}
