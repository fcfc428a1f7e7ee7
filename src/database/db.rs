//! SQLite persistence for review items
//!
//! Stores one row per tracked shortcut plus its review history. Timestamps are
//! written through rusqlite's chrono support (UTC text with sub-second
//! precision) and ratings as their lowercase token, so records round-trip
//! without loss.

use crate::error::StorageError;
use crate::models::{Rating, ReviewHistoryEntry, ReviewItem};
use crate::service::ReviewPersistence;
use log::{debug, info};
use rusqlite::{Connection, Result, params};
use std::collections::HashMap;
use std::path::Path;

/// Opens (or creates) the database at `path` and makes sure the tables exist.
pub fn init_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_tables(&conn)?;
    info!("Opened review database at {}", path.display());
    Ok(conn)
}

/// Same schema, nothing on disk. Used by tests and dry runs.
pub fn open_in_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_items (
            shortcut_id TEXT PRIMARY KEY,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetition_count INTEGER NOT NULL DEFAULT 0,
            due_at TEXT NOT NULL,
            last_reviewed_at TEXT,
            last_performance TEXT
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shortcut_id TEXT NOT NULL,
            reviewed_at TEXT NOT NULL,
            performance TEXT NOT NULL,
            FOREIGN KEY (shortcut_id) REFERENCES review_items(shortcut_id) ON DELETE CASCADE
        )",
        (),
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS review_history_shortcut ON review_history(shortcut_id)",
        (),
    )?;

    Ok(())
}

/// Inserts or overwrites the given items and their history in one transaction.
pub fn save_review_items(items: &[ReviewItem], conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut upsert = tx.prepare(
            "INSERT INTO review_items
                (shortcut_id, ease_factor, interval_days, repetition_count, due_at, last_reviewed_at, last_performance)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(shortcut_id) DO UPDATE SET
                ease_factor = excluded.ease_factor,
                interval_days = excluded.interval_days,
                repetition_count = excluded.repetition_count,
                due_at = excluded.due_at,
                last_reviewed_at = excluded.last_reviewed_at,
                last_performance = excluded.last_performance",
        )?;
        let mut clear_history = tx.prepare("DELETE FROM review_history WHERE shortcut_id = ?1")?;
        let mut add_history = tx.prepare(
            "INSERT INTO review_history (shortcut_id, reviewed_at, performance) VALUES (?1, ?2, ?3)",
        )?;

        for item in items {
            upsert.execute(params![
                item.id,
                item.ease_factor,
                item.interval_days,
                item.repetition_count,
                item.due_at,
                item.last_reviewed_at,
                item.last_performance,
            ])?;

            clear_history.execute(params![item.id])?;
            for entry in &item.review_history {
                add_history.execute(params![item.id, entry.reviewed_at, entry.performance])?;
            }
        }
    }
    tx.commit()?;

    debug!("Saved {} review items", items.len());
    Ok(())
}

/// Column values that cannot be decoded (an unknown rating token, a
/// malformed timestamp, a negative interval) surface as `CorruptRecord`.
fn decode_error(e: rusqlite::Error) -> StorageError {
    match e {
        rusqlite::Error::FromSqlConversionFailure(col, _, err) => {
            StorageError::CorruptRecord(format!("column {}: {}", col, err))
        }
        rusqlite::Error::InvalidColumnType(col, name, ty) => {
            StorageError::CorruptRecord(format!("column {} ({}) has type {}", col, name, ty))
        }
        rusqlite::Error::IntegralValueOutOfRange(col, value) => {
            StorageError::CorruptRecord(format!("column {}: {} out of range", col, value))
        }
        other => StorageError::Sqlite(other),
    }
}

/// Loads every stored item, sorted by id, with history oldest first.
pub fn load_review_items(
    conn: &Connection,
) -> std::result::Result<Vec<ReviewItem>, StorageError> {
    let mut history: HashMap<String, Vec<ReviewHistoryEntry>> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            "SELECT shortcut_id, reviewed_at, performance FROM review_history ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                ReviewHistoryEntry {
                    reviewed_at: row.get(1)?,
                    performance: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (id, entry) = row.map_err(decode_error)?;
            history.entry(id).or_default().push(entry);
        }
    }

    let mut stmt = conn.prepare(
        "SELECT shortcut_id, ease_factor, interval_days, repetition_count, due_at, last_reviewed_at, last_performance
         FROM review_items
         ORDER BY shortcut_id ASC",
    )?;

    let items = stmt
        .query_map([], |row| {
            let id: String = row.get(0)?;
            Ok(ReviewItem {
                ease_factor: row.get(1)?,
                interval_days: row.get(2)?,
                repetition_count: row.get(3)?,
                due_at: row.get(4)?,
                last_reviewed_at: row.get(5)?,
                last_performance: row.get::<_, Option<Rating>>(6)?,
                review_history: history.remove(&id).unwrap_or_default(),
                id,
            })
        })?
        .collect::<Result<Vec<_>>>()
        .map_err(decode_error)?;

    info!("Loaded {} review items", items.len());
    Ok(items)
}

impl ReviewPersistence for Connection {
    fn persist(&mut self, items: &[ReviewItem]) -> std::result::Result<(), StorageError> {
        save_review_items(items, self)?;
        Ok(())
    }
}
