//! Self-service check-in.
//!
//! Validation and the one-check-in-per-student-per-day rule live here as
//! plain functions over a [`RecordCollection`]. Persisting the result is the
//! caller's job.

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::record::{AttendanceRecord, RecordCollection};

/// Reasons a check-in is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckInError {
    /// A required field was empty after trimming.
    #[error("{field} is required")]
    Validation {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The student already checked in on this calendar day.
    #[error("student {student_id} already checked in on {day}")]
    DuplicateCheckIn {
        /// The student that tried to check in again.
        student_id: String,
        /// The calendar day of the existing check-in.
        day: NaiveDate,
    },
}

/// A submitted check-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInRequest {
    /// Student display name.
    pub name: String,
    /// Student identifier.
    pub student_id: String,
    /// Optional note.
    pub note: Option<String>,
}

impl CheckInRequest {
    /// Build a request without a note.
    #[must_use]
    pub fn new(name: impl Into<String>, student_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            student_id: student_id.into(),
            note: None,
        }
    }

    /// Attach a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Check a student in using the local clock.
///
/// # Errors
///
/// See [`check_in_at`].
pub fn check_in(
    collection: &RecordCollection,
    request: &CheckInRequest,
) -> Result<RecordCollection, CheckInError> {
    check_in_at(collection, request, Local::now().fixed_offset())
}

/// Check a student in at the given moment.
///
/// Returns `collection` with one record appended. The input is left untouched.
///
/// # Errors
///
/// Returns [`CheckInError::Validation`] if the trimmed name or student ID is
/// empty, and [`CheckInError::DuplicateCheckIn`] if the student already has a
/// record on the calendar day of `now`.
pub fn check_in_at(
    collection: &RecordCollection,
    request: &CheckInRequest,
    now: DateTime<FixedOffset>,
) -> Result<RecordCollection, CheckInError> {
    let name = request.name.trim();
    let student_id = request.student_id.trim();
    let note = request.note.as_deref().map_or("", str::trim);

    if name.is_empty() {
        return Err(CheckInError::Validation { field: "name" });
    }
    if student_id.is_empty() {
        return Err(CheckInError::Validation {
            field: "student ID",
        });
    }

    let today = now.date_naive();
    if collection
        .iter()
        .any(|r| r.is_same_day_for(student_id, today))
    {
        debug!("Rejecting repeat check-in for {} on {}", student_id, today);
        return Err(CheckInError::DuplicateCheckIn {
            student_id: student_id.to_string(),
            day: today,
        });
    }

    Ok(collection.with_appended(AttendanceRecord::new(name, student_id, note, now)))
}
