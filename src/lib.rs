//! Spaced-repetition scheduling for keyboard shortcut practice.

pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, load_config};
pub use error::{ConfigError, ReviewError, StorageError};
pub use models::{
    ItemStore, Rating, ReviewHistoryEntry, ReviewItem, ReviewResult, ReviewSession,
    SchedulingPolicy, SessionConfig, Statistics,
};
pub use service::{CompletionFailure, CompletionOutcome, ReviewPersistence, ReviewService};
