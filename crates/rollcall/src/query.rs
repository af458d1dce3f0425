//! Filtering of record collections for the dashboard.
//!
//! Filtering is pure: it never touches storage and never mutates its input.

use chrono::NaiveDate;

use crate::record::{AttendanceRecord, RecordCollection};

/// Optional predicates applied to a collection.
///
/// All present predicates must match (logical AND). A filter with no
/// predicates matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Exact calendar-day match.
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring of the student name.
    pub name_pattern: Option<String>,
}

impl RecordFilter {
    /// A filter matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a single calendar day.
    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Restrict to names containing `pattern`, ignoring case.
    #[must_use]
    pub fn name_contains(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// Whether no predicate will be applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.normalized_pattern().is_none()
    }

    /// Check a single record against the filter.
    #[must_use]
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(date) = self.date {
            if record.calendar_day() != date {
                return false;
            }
        }
        if let Some(pattern) = self.normalized_pattern() {
            if !record.name.to_lowercase().contains(&pattern) {
                return false;
            }
        }
        true
    }

    /// Trimmed, lowercased pattern; blank patterns count as absent.
    fn normalized_pattern(&self) -> Option<String> {
        self.name_pattern
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_lowercase)
    }
}

/// Apply `filter` to `collection`, preserving order.
#[must_use]
pub fn filter(collection: &RecordCollection, filter: &RecordFilter) -> RecordCollection {
    if filter.is_empty() {
        return collection.clone();
    }
    collection
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::{at, record};

    fn sample() -> RecordCollection {
        vec![
            record("Ana Li", "S1", "", at(2026, 10, 19, 8, 55)),
            record("Ben Ortiz", "S2", "late", at(2026, 10, 19, 9, 20)),
            record("ana maria", "S3", "", at(2026, 10, 20, 8, 50)),
            record("Carl", "S1", "", at(2026, 10, 20, 9, 0)),
        ]
        .into()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let c = sample();
        assert_eq!(filter(&c, &RecordFilter::new()), c);
    }

    #[test]
    fn test_filter_by_date() {
        let result = filter(&sample(), &RecordFilter::new().on(day(19)));
        let names: Vec<_> = result.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Li", "Ben Ortiz"]);
    }

    #[test]
    fn test_filter_by_date_no_match() {
        let result = filter(&sample(), &RecordFilter::new().on(day(1)));
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_by_name_case_insensitive() {
        let result = filter(&sample(), &RecordFilter::new().name_contains("ANA"));
        let ids: Vec<_> = result.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S3"]);
    }

    #[test]
    fn test_filter_name_pattern_is_trimmed() {
        let result = filter(&sample(), &RecordFilter::new().name_contains("  ortiz "));
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(0).unwrap().name, "Ben Ortiz");
    }

    #[test]
    fn test_blank_name_pattern_matches_all() {
        let c = sample();
        let f = RecordFilter::new().name_contains("   ");
        assert!(f.is_empty());
        assert_eq!(filter(&c, &f), c);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let f = RecordFilter::new().on(day(20)).name_contains("ana");
        let result = filter(&sample(), &f);
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(0).unwrap().student_id, "S3");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let f = RecordFilter::new().name_contains("a");
        let once = filter(&sample(), &f);
        let twice = filter(&once, &f);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let c = sample();
        let before = c.clone();
        let _ = filter(&c, &RecordFilter::new().on(day(19)));
        assert_eq!(c, before);
    }
}
