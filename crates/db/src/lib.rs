//! SQLite reader for the scheduler tables the dashboard reports on.

mod allocations;
mod error;
mod heartbeat;
mod helpers;
mod migrations;
mod queues;
mod snapshot;
mod status_rows;

use std::path::Path;

use monitor_core::Anomaly;
use rusqlite::Connection;

pub use error::{DbError, Result};

/// Rows of one query together with the rows that were skipped or repaired
/// while reading them.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub rows: T,
    pub anomalies: Vec<Anomaly>,
}

impl<T: Default> Default for Fetched<T> {
    fn default() -> Self {
        Self {
            rows: T::default(),
            anomalies: Vec::new(),
        }
    }
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "busy_timeout", 5_000)?;
        Ok(Self { conn })
    }
}
