//! SQLite connection for the gittools sync store.

use std::path::Path;
use std::time::Duration;

use log::debug;
use rusqlite::Connection;

use super::migrations;
use crate::types::errors::StorageError;

/// How long a write waits on another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the SQLite connection backing the sync store.
///
/// Several background processes may open the same file, so file databases
/// run in WAL mode with a busy timeout; writers then serialise instead of
/// failing with `SQLITE_BUSY`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database at `path` and brings the schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!("Opened {} (journal_mode = {})", path.display(), mode);
        Self::migrated(conn)
    }

    /// In-memory database, discarded on drop.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self, StorageError> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> i32 {
        migrations::get_schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
