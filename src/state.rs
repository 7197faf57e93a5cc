use crate::models::Entry;
use eyre::Result;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

use crate::config::get_app_data_prefix;

/// Key under which the whole saved list is stored as one serialized value.
pub const SAVED_ENTRIES_KEY: &str = "savedEntries";

/// Persisted saved-entries list. Both operations may fail; callers decide
/// how to degrade.
pub trait ListStore {
    /// The whole list, newest first. A missing value reads as empty.
    fn get(&self) -> Result<Vec<Entry>>;

    /// Replace the whole list.
    fn set(&self, entries: &[Entry]) -> Result<()>;
}

pub struct State {
    conn: Connection,
}

impl State {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        Self::open(&prefix.join("states.db"))
    }

    pub fn open(filepath: &Path) -> Result<Self> {
        if let Some(parent) = filepath.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(filepath)?;
        Self::init_db(&conn)?;

        Ok(Self { conn })
    }

    fn init_db(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl ListStore for State {
    fn get(&self) -> Result<Vec<Entry>> {
        match self.get_value(SAVED_ENTRIES_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn set(&self, entries: &[Entry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.set_value(SAVED_ENTRIES_KEY, &raw)
    }
}
