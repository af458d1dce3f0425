//! Attendance workflows bound to a record store.
//!
//! [`AttendanceService`] is the handle the front end talks to. Reads go
//! through [`RecordStore::load`]; each mutation is one
//! [`RecordStore::update`] so the read-modify-write cannot interleave with
//! another writer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use tracing::info;

use crate::admin::{self, AdminPanel};
use crate::checkin::{self, CheckInRequest};
use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::query::{self, RecordFilter};
use crate::record::{AttendanceRecord, RecordCollection};
use crate::storage::RecordStore;
use crate::view::{self, TabularView};

/// Outcome of writing an export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Where the file was written.
    pub path: PathBuf,
    /// Number of data rows, excluding the header.
    pub rows: usize,
}

/// Check-in, dashboard and admin operations over a store.
#[derive(Debug)]
pub struct AttendanceService<S> {
    store: S,
    display: DisplayConfig,
}

impl<S: RecordStore> AttendanceService<S> {
    /// Wrap `store`, formatting views with `display`.
    pub fn new(store: S, display: DisplayConfig) -> Self {
        Self { store, display }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current collection, in insertion order.
    pub fn records(&self) -> RecordCollection {
        self.store.load()
    }

    /// Check a student in now and persist the record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CheckIn`] for invalid or repeat submissions, or a
    /// storage error.
    pub fn check_in(&self, request: &CheckInRequest) -> Result<AttendanceRecord> {
        self.check_in_at(request, Local::now().fixed_offset())
    }

    /// Check a student in at `now` and persist the record.
    ///
    /// # Errors
    ///
    /// See [`AttendanceService::check_in`].
    pub fn check_in_at(
        &self,
        request: &CheckInRequest,
        now: DateTime<FixedOffset>,
    ) -> Result<AttendanceRecord> {
        let saved = self
            .store
            .update(|current| Ok(checkin::check_in_at(current, request, now)?))?;

        let record = saved
            .as_slice()
            .last()
            .cloned()
            .ok_or_else(|| Error::internal("check-in saved an empty collection"))?;
        info!(
            "Checked in {} ({}) on {}",
            record.name,
            record.student_id,
            record.calendar_day()
        );
        Ok(record)
    }

    /// Records matching `filter`.
    pub fn search(&self, filter: &RecordFilter) -> RecordCollection {
        query::filter(&self.store.load(), filter)
    }

    /// Dashboard table for records matching `filter`.
    pub fn dashboard(&self, filter: &RecordFilter) -> TabularView {
        view::render_view(&self.search(filter), &self.display)
    }

    /// CSV text for records matching `filter`.
    pub fn export_csv(&self, filter: &RecordFilter) -> String {
        view::export_csv(&self.search(filter), &self.display)
    }

    /// Write the CSV for records matching `filter` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExportWrite`] if the file cannot be written.
    pub fn export_to(&self, filter: &RecordFilter, path: &Path) -> Result<ExportSummary> {
        let records = self.search(filter);
        let csv = view::export_csv(&records, &self.display);

        std::fs::write(path, csv).map_err(|source| Error::ExportWrite {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Exported {} records to {}", records.len(), path.display());
        Ok(ExportSummary {
            path: path.to_path_buf(),
            rows: records.len(),
        })
    }

    /// Write the CSV into `dir` under today's export file name.
    ///
    /// # Errors
    ///
    /// See [`AttendanceService::export_to`].
    pub fn export_into_dir(&self, filter: &RecordFilter, dir: &Path) -> Result<ExportSummary> {
        let name = view::export_filename(Local::now().date_naive());
        self.export_to(filter, &dir.join(name))
    }

    /// Full table for the admin panel.
    pub fn admin_view(&self, _panel: &AdminPanel) -> TabularView {
        view::render_view(&self.store.load(), &self.display)
    }

    /// Delete the record at `index`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Admin`] with
    /// [`IndexOutOfRange`](crate::admin::AdminError::IndexOutOfRange) when the
    /// index no longer exists; nothing is written in that case.
    pub fn delete(&self, _panel: &AdminPanel, index: i64) -> Result<AttendanceRecord> {
        let mut removed = None;
        self.store.update(|current| {
            let next = admin::delete_record(current, index)?;
            removed = usize::try_from(index)
                .ok()
                .and_then(|i| current.get(i))
                .cloned();
            Ok(next)
        })?;

        let record = removed.ok_or_else(|| Error::internal("deleted record missing"))?;
        info!(
            "Deleted check-in of {} ({}) from {}",
            record.name,
            record.student_id,
            record.calendar_day()
        );
        Ok(record)
    }

    /// Remove every record, returning how many there were.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the empty collection cannot be written.
    pub fn clear(&self, _panel: &AdminPanel) -> Result<usize> {
        let mut cleared = 0;
        self.store.update(|current| {
            cleared = current.len();
            Ok(admin::clear_all(current))
        })?;
        info!("Cleared {} records", cleared);
        Ok(cleared)
    }
}
