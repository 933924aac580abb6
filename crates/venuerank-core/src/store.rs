//! SQLite-backed persistence for the override snapshot.
//!
//! One `prefs(key, value)` table, one well-known key. The override map is
//! stored as a single serialized value; this module never looks inside it.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};

use crate::CoreError;
use crate::overrides::OverrideBackend;

/// The single preference key holding the override snapshot.
pub const OVERRIDES_KEY: &str = "venue_rank_overrides";

/// Durable key-value backend over a local SQLite file.
pub struct SqliteBackend {
    conn: Connection,
    path: PathBuf,
}

impl SqliteBackend {
    /// Open (or create) the preference database at `path`.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             CREATE TABLE IF NOT EXISTS prefs (
                 key   TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );",
        )?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OverrideBackend for SqliteBackend {
    fn load(&mut self) -> Result<Option<String>, CoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM prefs WHERE key = ?1")?;
        let value = stmt
            .query_row(params![OVERRIDES_KEY], |row| row.get(0))
            .ok();
        Ok(value)
    }

    fn save(&mut self, snapshot: &str) -> Result<(), CoreError> {
        self.conn.execute(
            "INSERT INTO prefs (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![OVERRIDES_KEY, snapshot],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::OverrideStore;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");

        let mut backend = SqliteBackend::open(&path).unwrap();
        assert_eq!(backend.load().unwrap(), None);

        backend.save(r#"{"a":"Q1"}"#).unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some(r#"{"a":"Q1"}"#));

        // Save replaces, never appends
        backend.save(r#"{"b":"Q2"}"#).unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some(r#"{"b":"Q2"}"#));
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("prefs.db");
        let backend = SqliteBackend::open(&path).unwrap();
        assert!(backend.path().parent().unwrap().exists());
    }

    #[test]
    fn test_overrides_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");

        {
            let backend = SqliteBackend::open(&path).unwrap();
            let mut store = OverrideStore::load(Box::new(backend));
            store.set("My Journal", "Q1").unwrap();
            store.set("My Conference", "A*").unwrap();
        }

        let backend = SqliteBackend::open(&path).unwrap();
        let store = OverrideStore::load(Box::new(backend));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("my journal"), Some("Q1"));
        assert_eq!(store.get("MY CONFERENCE"), Some("A*"));
    }

    #[test]
    fn test_corrupted_value_recovered_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");

        {
            let mut backend = SqliteBackend::open(&path).unwrap();
            backend.save("definitely not json").unwrap();
        }

        let backend = SqliteBackend::open(&path).unwrap();
        let store = OverrideStore::load(Box::new(backend));
        assert!(store.is_empty());

        // The bad value was overwritten with an empty snapshot
        let mut backend = SqliteBackend::open(&path).unwrap();
        assert_eq!(backend.load().unwrap().as_deref(), Some("{}"));
    }
}
