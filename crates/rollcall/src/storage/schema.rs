//! `SQLite` schema definitions for rollcall.
//!
//! The record collection itself is an opaque JSON value in `kv_store`; these
//! tables only describe the container it lives in.

/// SQL statement to create the key/value table holding persisted blobs.
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Statements that make up schema version 1.
pub const SCHEMA_V1: &[&str] = &[CREATE_KV_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_table_columns() {
        assert!(CREATE_KV_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_KV_TABLE.contains("value TEXT NOT NULL"));
    }

    #[test]
    fn test_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }

    #[test]
    fn test_schema_v1_not_empty() {
        assert!(!SCHEMA_V1.is_empty());
        assert!(SCHEMA_V1.iter().all(|stmt| !stmt.trim().is_empty()));
    }
}
