//! Core attendance types for rollcall.
//!
//! This module defines the check-in record and the ordered collection that is
//! persisted as a single unit by the storage layer.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single check-in event.
///
/// Records are created by the check-in workflow and never modified afterwards;
/// they can only be removed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Student display name, trimmed of surrounding whitespace.
    pub name: String,

    /// Opaque student identifier.
    #[serde(rename = "studentId")]
    pub student_id: String,

    /// Optional free-text note. Empty when none was given.
    #[serde(default)]
    pub note: String,

    /// When the check-in happened, in the local offset of the submitting machine.
    #[serde(rename = "date")]
    pub timestamp: DateTime<FixedOffset>,
}

impl AttendanceRecord {
    /// Create a record stamped with the given moment.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        student_id: impl Into<String>,
        note: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            name: name.into(),
            student_id: student_id.into(),
            note: note.into(),
            timestamp,
        }
    }

    /// The calendar day this check-in belongs to.
    ///
    /// This is the date as written in the record's own offset, i.e. the
    /// `YYYY-MM-DD` prefix of the persisted timestamp.
    #[must_use]
    pub fn calendar_day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Whether this record belongs to `student_id` on `day`.
    #[must_use]
    pub fn is_same_day_for(&self, student_id: &str, day: NaiveDate) -> bool {
        self.student_id == student_id && self.calendar_day() == day
    }
}

/// The ordered list of all check-ins.
///
/// Insertion order is preserved. Workflows never mutate a collection in
/// place; they return a new one for the caller to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordCollection(Vec<AttendanceRecord>);

impl RecordCollection {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AttendanceRecord> {
        self.0.get(index)
    }

    /// Iterate over records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, AttendanceRecord> {
        self.0.iter()
    }

    /// Borrow the records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[AttendanceRecord] {
        &self.0
    }

    /// Return a copy of this collection with `record` appended.
    #[must_use]
    pub fn with_appended(&self, record: AttendanceRecord) -> Self {
        let mut records = self.0.clone();
        records.push(record);
        Self(records)
    }

    /// Return a copy of this collection without the record at `index`.
    ///
    /// Returns `None` if `index` is out of range.
    #[must_use]
    pub fn without(&self, index: usize) -> Option<Self> {
        if index >= self.0.len() {
            return None;
        }
        let mut records = self.0.clone();
        records.remove(index);
        Some(Self(records))
    }

    /// Earliest check-in time, if any.
    #[must_use]
    pub fn oldest(&self) -> Option<DateTime<FixedOffset>> {
        self.0.iter().map(|r| r.timestamp).min()
    }

    /// Latest check-in time, if any.
    #[must_use]
    pub fn newest(&self) -> Option<DateTime<FixedOffset>> {
        self.0.iter().map(|r| r.timestamp).max()
    }
}

impl From<Vec<AttendanceRecord>> for RecordCollection {
    fn from(records: Vec<AttendanceRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<AttendanceRecord> for RecordCollection {
    fn from_iter<I: IntoIterator<Item = AttendanceRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for RecordCollection {
    type Item = AttendanceRecord;
    type IntoIter = std::vec::IntoIter<AttendanceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a AttendanceRecord;
    type IntoIter = std::slice::Iter<'a, AttendanceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
