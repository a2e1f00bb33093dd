use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use log::debug;
use rusqlite::Connection;

use crate::observe::{ChangeNotifier, Watcher};

/// Bumped whenever the table layout changes. Stored in `PRAGMA user_version`.
const SCHEMA_VERSION: i32 = 1;

/// Handle to the embedded SQLite catalog. Cloning is cheap: every clone
/// shares the same connection and the same set of change observers.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    changes: ChangeNotifier,
}

impl Database {
    /// Open (or create) the database file at `path`, creating parent
    /// directories and the schema as needed.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }

        let conn = Connection::open(path).context("failed to open SQLite database")?;
        debug!("opened catalog database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Create an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            changes: ChangeNotifier::new(),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))?;
        f(&conn)
    }

    /// Register a change observer.
    pub fn watch(&self) -> Watcher {
        self.changes.watch()
    }

    /// Wake every observer. Writes made through the repository call this
    /// automatically; anything that edits the connection directly must call
    /// it by hand.
    pub fn notify_changed(&self) {
        self.changes.notify();
    }
}

/// Create the table on a fresh database and record the schema version.
fn ensure_schema(conn: &Connection) -> Result<()> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read schema version")?;

    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    conn.execute(
        "CREATE TABLE IF NOT EXISTS content_items (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            estimated_time TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create content_items table")?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .context("failed to record schema version")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_version_is_recorded() -> Result<()> {
        let db = Database::open_in_memory()?;
        let version: i32 = db.with_conn(|conn| {
            Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
        })?;
        assert_eq!(version, SCHEMA_VERSION);
        Ok(())
    }

    #[test]
    fn reopening_a_file_keeps_rows() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("catalog.sqlite");
        {
            let db = Database::open_at(&path)?;
            db.with_conn(|conn| crate::db::insert_items(conn, &crate::db::seed_items()))?;
        }
        let db = Database::open_at(&path)?;
        assert_eq!(db.with_conn(crate::db::count_items)?, 12);
        Ok(())
    }
}
