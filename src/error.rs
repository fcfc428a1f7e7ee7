//! Error types for the review engine.
//!
//! `ReviewError` covers domain failures that callers branch on, `StorageError`
//! covers the SQLite and JSON backends, `ConfigError` covers engine settings.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Invalid rating: {0:?}")]
    InvalidRating(String),

    #[error("Invalid shortcut id: {0:?}")]
    InvalidId(String),

    #[error("Result for {0} is not part of the session")]
    ResultNotInSession(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Persistence channel closed")]
    ChannelClosed,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scheduling policy: {0}")]
    InvalidPolicy(String),
}

pub type Result<T, E = ReviewError> = std::result::Result<T, E>;
