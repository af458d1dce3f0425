//! Storage layer for rollcall.
//!
//! The whole record collection is persisted as one JSON value under a fixed
//! key. There are no partial updates: every write replaces the collection.
//! Reads fail open, so a missing or unreadable value is an empty collection.

pub mod memory;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::RecordCollection;

pub use memory::MemoryStore;

/// How long a writer waits for another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persistence for the record collection.
pub trait RecordStore {
    /// Read the current collection.
    ///
    /// Never fails: an absent or malformed value yields an empty collection.
    fn load(&self) -> RecordCollection;

    /// Replace the stored collection with `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn save(&self, collection: &RecordCollection) -> Result<()>;

    /// Read, transform and write the collection as one exclusive unit.
    ///
    /// Nothing is written if `f` fails. Returns the collection that was saved.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a storage error.
    fn update<F>(&self, f: F) -> Result<RecordCollection>
    where
        F: FnOnce(&RecordCollection) -> Result<RecordCollection>;
}

/// Decode a stored value, falling back to an empty collection.
pub(crate) fn decode_collection(raw: Option<&str>) -> RecordCollection {
    let Some(raw) = raw else {
        return RecordCollection::new();
    };
    match serde_json::from_str(raw) {
        Ok(collection) => collection,
        Err(e) => {
            warn!("Discarding unreadable attendance data: {}", e);
            RecordCollection::new()
        }
    }
}

/// `SQLite`-backed record store.
///
/// The collection is kept as a single row of the `kv_store` table.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Key of the row holding the collection.
    key: String,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn,
            key: key.into(),
        })
    }

    /// Open the store described by `config`.
    ///
    /// # Errors
    ///
    /// See [`SqliteStore::open`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(config.database_path(), config.storage.storage_key.clone())
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory(key: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            key: key.into(),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key the collection is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_raw(conn: &Connection, key: &str) -> Result<Option<String>> {
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_raw(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            (key, value),
        )?;
        Ok(())
    }

    fn read_updated_at(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Get storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database or its file metadata cannot be read.
    pub fn stats(&self) -> Result<StoreStats> {
        let collection = self.load();
        let last_saved = self.read_updated_at()?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path)?.len()
        };

        Ok(StoreStats {
            total_records: collection.len(),
            oldest_record: collection.oldest(),
            newest_record: collection.newest(),
            last_saved,
            db_size_bytes,
        })
    }
}

impl RecordStore for SqliteStore {
    fn load(&self) -> RecordCollection {
        match Self::read_raw(&self.conn, &self.key) {
            Ok(raw) => decode_collection(raw.as_deref()),
            Err(e) => {
                warn!("Failed to read attendance data, treating as empty: {}", e);
                RecordCollection::new()
            }
        }
    }

    fn save(&self, collection: &RecordCollection) -> Result<()> {
        let value = serde_json::to_string(collection)?;
        Self::write_raw(&self.conn, &self.key, &value)?;
        debug!("Saved {} records under {}", collection.len(), self.key);
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<RecordCollection>
    where
        F: FnOnce(&RecordCollection) -> Result<RecordCollection>,
    {
        // IMMEDIATE takes the write lock up front so two processes cannot
        // both read the same collection and overwrite each other.
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        // Only unparseable data fails open here; a failed read must not be
        // followed by a write over the stored collection.
        let raw = Self::read_raw(&tx, &self.key)?;
        let current = decode_collection(raw.as_deref());

        let next = f(&current)?;
        let value = serde_json::to_string(&next)?;
        Self::write_raw(&tx, &self.key, &value)?;
        tx.commit()?;

        debug!(
            "Updated {} from {} to {} records",
            self.key,
            current.len(),
            next.len()
        );
        Ok(next)
    }
}

/// Statistics about the stored collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored check-ins.
    pub total_records: usize,
    /// Timestamp of the earliest check-in.
    pub oldest_record: Option<DateTime<FixedOffset>>,
    /// Timestamp of the latest check-in.
    pub newest_record: Option<DateTime<FixedOffset>>,
    /// When the collection was last written (`SQLite` UTC `datetime`), if ever.
    pub last_saved: Option<String>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
