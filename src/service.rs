//! The review engine as seen by the UI layer.
//!
//! `ReviewService` owns the item store outright. Construct one per learner and
//! hand out references; mutation goes through `&mut self`, so updates to an
//! item can never interleave. Share across threads with `Arc<Mutex<_>>`.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{Result, ReviewError, StorageError};
use crate::models::{
    ItemStore, ReviewItem, ReviewResult, ReviewSession, SchedulingPolicy, SessionConfig,
    Statistics,
};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use uuid::Uuid;

/// Receives every record changed by a successful mutation batch.
pub trait ReviewPersistence {
    fn persist(&mut self, items: &[ReviewItem]) -> Result<(), StorageError>;
}

/// Hands changed records to another thread instead of writing them here.
impl ReviewPersistence for Sender<Vec<ReviewItem>> {
    fn persist(&mut self, items: &[ReviewItem]) -> Result<(), StorageError> {
        self.send(items.to_vec())
            .map_err(|_| StorageError::ChannelClosed)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionFailure {
    pub shortcut_id: String,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: ReviewError,
}

fn serialize_reason<S: serde::Serializer>(
    reason: &ReviewError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub session_id: Uuid,
    pub updated_count: usize,
    pub failures: Vec<CompletionFailure>,
    pub statistics: Statistics,
    /// Set when the persistence hook rejected the batch. The in-memory store
    /// keeps the update either way.
    pub persistence_error: Option<String>,
}

pub struct ReviewService {
    store: ItemStore,
    clock: Box<dyn Clock>,
    persistence: Option<Box<dyn ReviewPersistence + Send>>,
    default_max_items: u32,
}

impl ReviewService {
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self {
            store: ItemStore::new(policy),
            clock: Box::new(SystemClock),
            persistence: None,
            default_max_items: SessionConfig::default().max_items,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut service = Self::new(config.policy.clone());
        service.default_max_items = config.default_max_items;
        service
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_persistence(mut self, hook: impl ReviewPersistence + Send + 'static) -> Self {
        self.persistence = Some(Box::new(hook));
        self
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Starts tracking the given catalog ids. Ids already tracked keep their
    /// state, so this can be called again whenever the catalog grows.
    /// Returns how many items were created.
    pub fn initialize_system<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<usize> {
        let now = self.clock.now();
        let created = self.store.initialize(ids, now)?;
        info!(
            "Initialized {} new review items ({} tracked)",
            created.len(),
            self.store.len()
        );
        if let Err(e) = self.persist(&created) {
            error!("Failed to persist initialized items: {}", e);
        }
        Ok(created.len())
    }

    /// Session config with this service's default size.
    pub fn default_session_config(&self) -> SessionConfig {
        SessionConfig {
            max_items: self.default_max_items,
            focus_on_difficult: false,
        }
    }

    pub fn create_review_session(&self, config: SessionConfig) -> ReviewSession {
        let session = ReviewSession::build(&self.store, config, self.clock.now());
        info!(
            "Created review session {} with {} items (focus on difficult: {})",
            session.id(),
            session.len(),
            config.focus_on_difficult
        );
        session
    }

    /// Applies the learner's ratings for `session`.
    ///
    /// Results for shortcuts outside the session are reported in `failures`
    /// and skipped; the rest still apply. When a shortcut appears more than
    /// once, only its last result counts. Session items without a result stay
    /// as they were. `failures` follows the order of `results`.
    pub fn complete_review_session(
        &mut self,
        session: ReviewSession,
        results: &[ReviewResult],
    ) -> CompletionOutcome {
        let now = self.clock.now();
        let mut failures = Vec::new();

        let mut last_index: HashMap<&str, usize> = HashMap::new();
        for (idx, result) in results.iter().enumerate() {
            let id = result.shortcut_id.as_str();
            if session.contains(id) && last_index.insert(id, idx).is_some() {
                debug!("Result for {} superseded by a later entry", id);
            }
        }

        let mut updated = Vec::new();
        for (idx, result) in results.iter().enumerate() {
            let id = result.shortcut_id.as_str();
            if !session.contains(id) {
                warn!("Rejected result for {} outside session {}", id, session.id());
                failures.push(CompletionFailure {
                    shortcut_id: id.to_string(),
                    reason: ReviewError::ResultNotInSession(id.to_string()),
                });
                continue;
            }
            if last_index.get(id) != Some(&idx) {
                continue;
            }
            match self.store.apply(id, result.performance, now) {
                Ok(item) => {
                    debug!(
                        "Rated {} as {} in {} ms, next due {}",
                        id, result.performance, result.response_time_ms, item.due_at
                    );
                    updated.push(item.clone());
                }
                Err(e) => {
                    warn!("Rejected result for {}: {}", id, e);
                    failures.push(CompletionFailure {
                        shortcut_id: id.to_string(),
                        reason: e,
                    });
                }
            }
        }

        let persistence_error = self.persist(&updated).err().map(|e| {
            error!("Failed to persist session {}: {}", session.id(), e);
            e.to_string()
        });

        info!(
            "Completed session {}: {} updated, {} failed",
            session.id(),
            updated.len(),
            failures.len()
        );

        CompletionOutcome {
            session_id: session.id(),
            updated_count: updated.len(),
            failures,
            statistics: self.get_statistics(),
            persistence_error,
        }
    }

    pub fn get_statistics(&self) -> Statistics {
        Statistics::compute(&self.store, self.clock.now())
    }

    pub fn snapshot(&self) -> Vec<ReviewItem> {
        self.store.snapshot()
    }

    /// Replaces every tracked record, e.g. after loading from disk. Does not
    /// call the persistence hook.
    pub fn restore(&mut self, items: Vec<ReviewItem>) {
        self.store.replace_all(items);
        info!("Restored {} review items", self.store.len());
    }

    fn persist(&mut self, items: &[ReviewItem]) -> Result<(), StorageError> {
        match self.persistence.as_mut() {
            Some(hook) if !items.is_empty() => hook.persist(items),
            _ => Ok(()),
        }
    }
}
