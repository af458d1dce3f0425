//! In-process record store.
//!
//! Holds the serialized collection in memory, so it behaves like the
//! database-backed store (including fail-open reads) without touching disk.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::{decode_collection, RecordStore};
use crate::error::Result;
use crate::record::RecordCollection;

/// Record store backed by a mutex-guarded string.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose persisted value is `raw`, verbatim.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(raw.into())),
        }
    }

    /// The persisted value, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.blob.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> RecordCollection {
        decode_collection(self.lock().as_deref())
    }

    fn save(&self, collection: &RecordCollection) -> Result<()> {
        let value = serde_json::to_string(collection)?;
        *self.lock() = Some(value);
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<RecordCollection>
    where
        F: FnOnce(&RecordCollection) -> Result<RecordCollection>,
    {
        let mut blob = self.lock();
        let current = decode_collection(blob.as_deref());
        let next = f(&current)?;
        *blob = Some(serde_json::to_string(&next)?);
        debug!("Updated memory store to {} records", next.len());
        Ok(next)
    }
}
