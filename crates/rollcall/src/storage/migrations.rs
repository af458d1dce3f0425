//! Versioning of the database container.
//!
//! Each entry of [`MIGRATIONS`] brings the database from the previous version
//! to its own. The stored record blob is never rewritten by a migration.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::{CREATE_METADATA_TABLE, SCHEMA_V1};

/// Ordered list of `(version, statements)` steps.
pub const MIGRATIONS: &[(i32, &[&str])] = &[(1, SCHEMA_V1)];

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// The version a fully migrated database reports.
#[must_use]
pub fn current_version() -> i32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Create the metadata table and apply any pending migrations.
///
/// # Errors
///
/// Returns an error if a statement fails or the stored version is unreadable.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let from = schema_version(conn)?;
    if from > current_version() {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {from} is newer than supported version {}",
                current_version()
            ),
        });
    }

    for (version, statements) in MIGRATIONS.iter().filter(|(v, _)| *v > from) {
        debug!("Applying schema migration {}", version);
        let tx = conn.unchecked_transaction()?;
        for statement in *statements {
            tx.execute(statement, [])?;
        }
        tx.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            (VERSION_KEY, version.to_string()),
        )?;
        tx.commit()?;
    }

    Ok(())
}

/// Read the stored schema version; 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(v) => v.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {v}"),
        }),
    }
}
