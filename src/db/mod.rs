//! Read access to the tracker store's SQLite database.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use rusqlite::{Connection, OpenFlags};

mod events;
mod helpers;

pub use events::EventTable;

pub struct Database {
    conn: Connection,
    db_path: PathBuf,
}

impl Database {
    /// Open an existing database read-only. The file is never created or migrated.
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if !db_path.exists() {
            bail!("database file {} does not exist", db_path.display());
        }

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open SQLite database {}", db_path.display()))?;

        info!("Database opened at {}", db_path.display());

        Ok(Self { conn, db_path })
    }

    /// Wrap an already-open connection (used for in-memory stores).
    pub fn from_connection(conn: Connection) -> Self {
        let db_path = conn
            .path()
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(":memory:"));
        Self { conn, db_path }
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        task(&self.conn)
    }

    fn ensure_table(&self, table: &str) -> Result<()> {
        let table = table.to_string();
        let found: i64 = self.execute(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [&table],
                |row| row.get(0),
            )
            .context("failed to inspect schema")
        })?;

        if found == 0 {
            bail!("table '{table}' not found in {}", self.db_path.display());
        }
        Ok(())
    }
}
