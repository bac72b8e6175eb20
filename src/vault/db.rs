//! The vault handle — one SQLite connection plus the schema it needs.
//!
//! A `Vault` owns its `Connection` exclusively; there is no global state.
//! Every metadata and record operation is a method on the handle, and
//! the caller decides how long the handle lives.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use crate::errors::{Result, VaultError};

/// How long SQLite waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS metadata (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS entries (
    id                TEXT PRIMARY KEY NOT NULL,
    name              TEXT NOT NULL UNIQUE,
    category          TEXT NOT NULL DEFAULT 'general',
    encrypted_payload BLOB NOT NULL,
    encrypted_search  BLOB NOT NULL,
    payload_nonce     BLOB NOT NULL,
    search_nonce      BLOB NOT NULL,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_category ON entries(category);
";

/// An open vault database.
pub struct Vault {
    pub(crate) conn: Connection,

    /// `None` for in-memory vaults.
    path: Option<PathBuf>,
}

impl Vault {
    /// Open (or create) the vault database at `path`.
    ///
    /// Creates the parent directory if needed and restricts both the
    /// directory and the database file to the owner on Unix.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
                }
            }
        }

        let conn = Connection::open(path).map_err(VaultError::persistence("open database"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        let vault = Self::configure(conn, Some(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "vault opened");
        Ok(vault)
    }

    /// Open a throwaway vault that lives only in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(VaultError::persistence("open database"))?;
        Self::configure(conn, None)
    }

    fn configure(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(VaultError::persistence("set busy timeout"))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(VaultError::persistence("enable foreign keys"))?;

        // journal_mode answers with the resulting mode; in-memory
        // databases report "memory" and that is fine.
        let _mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(VaultError::persistence("set journal mode"))?;

        conn.execute_batch(SCHEMA)
            .map_err(VaultError::persistence("create schema"))?;

        Ok(Self { conn, path })
    }

    /// Path of the database file, if the vault is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
