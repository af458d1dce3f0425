//! Dashboard rendering and CSV export.
//!
//! Both the table view and the CSV export format each record the same way:
//! the timestamp through the configured display format, the other fields as
//! stored.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::DisplayConfig;
use crate::record::{AttendanceRecord, RecordCollection};

/// Column titles shared by the table view and the CSV header.
pub const COLUMNS: [&str; 4] = ["Date/Time", "Name", "Student ID", "Note"];

/// Text shown in place of rows when there is nothing to display.
pub const NO_RECORDS: &str = "No records found.";

/// One record formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    /// Formatted check-in time.
    pub timestamp: String,
    /// Student name.
    pub name: String,
    /// Student identifier.
    pub student_id: String,
    /// Note, or the placeholder when empty.
    pub note: String,
}

impl DisplayRow {
    fn cells(&self) -> [&str; 4] {
        [&self.timestamp, &self.name, &self.student_id, &self.note]
    }
}

/// A row of the rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRow {
    /// A formatted record.
    Record(DisplayRow),
    /// Explicit "nothing here" marker for an empty view.
    Placeholder(&'static str),
}

/// Rendered dashboard table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularView {
    rows: Vec<ViewRow>,
}

impl TabularView {
    /// All rows, including a placeholder row for an empty view.
    #[must_use]
    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    /// Only the record rows.
    pub fn records(&self) -> impl Iterator<Item = &DisplayRow> {
        self.rows.iter().filter_map(|row| match row {
            ViewRow::Record(r) => Some(r),
            ViewRow::Placeholder(_) => None,
        })
    }

    /// Whether the view holds only the placeholder row.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.rows.as_slice(), [ViewRow::Placeholder(_)])
    }

    /// Lay the view out as an aligned text table.
    ///
    /// With `indexed`, a leading `#` column carries each record's position,
    /// which is what the admin delete command takes.
    #[must_use]
    pub fn to_table(&self, indexed: bool) -> String {
        let mut widths = COLUMNS.map(str::len);
        for row in self.records() {
            for (w, cell) in widths.iter_mut().zip(row.cells()) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let index_width = self.rows.len().saturating_sub(1).to_string().len().max(1);

        let mut out = String::new();
        if indexed {
            let _ = write!(out, "{:<index_width$}  ", "#");
        }
        push_cells(&mut out, &COLUMNS, &widths);

        let total: usize = widths.iter().sum::<usize>()
            + 2 * (COLUMNS.len() - 1)
            + if indexed { index_width + 2 } else { 0 };
        out.push_str(&"-".repeat(total));
        out.push('\n');

        for (i, row) in self.rows.iter().enumerate() {
            match row {
                ViewRow::Record(r) => {
                    if indexed {
                        let _ = write!(out, "{i:<index_width$}  ");
                    }
                    push_cells(&mut out, &r.cells(), &widths);
                }
                ViewRow::Placeholder(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
            }
        }
        out
    }
}

fn push_cells(out: &mut String, cells: &[&str; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn format_timestamp(record: &AttendanceRecord, display: &DisplayConfig) -> String {
    record
        .timestamp
        .format(&display.timestamp_format)
        .to_string()
}

/// Format a record for the dashboard.
#[must_use]
pub fn display_row(record: &AttendanceRecord, display: &DisplayConfig) -> DisplayRow {
    let note = if record.note.is_empty() {
        display.empty_note_placeholder.clone()
    } else {
        record.note.clone()
    };
    DisplayRow {
        timestamp: format_timestamp(record, display),
        name: record.name.clone(),
        student_id: record.student_id.clone(),
        note,
    }
}

/// Render `records` as a table view.
///
/// An empty input yields a single placeholder row rather than an empty table.
#[must_use]
pub fn render_view(records: &RecordCollection, display: &DisplayConfig) -> TabularView {
    if records.is_empty() {
        return TabularView {
            rows: vec![ViewRow::Placeholder(NO_RECORDS)],
        };
    }
    TabularView {
        rows: records
            .iter()
            .map(|r| ViewRow::Record(display_row(r, display)))
            .collect(),
    }
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| csv_quote(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize `records` as CSV.
///
/// Every field is quoted and embedded quotes are doubled. Lines are joined
/// with `\n`. Empty notes stay empty rather than using the view placeholder.
#[must_use]
pub fn export_csv(records: &RecordCollection, display: &DisplayConfig) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(csv_line(&COLUMNS));
    for record in records {
        let timestamp = format_timestamp(record, display);
        lines.push(csv_line(&[
            timestamp.as_str(),
            record.name.as_str(),
            record.student_id.as_str(),
            record.note.as_str(),
        ]));
    }
    lines.join("\n")
}

/// File name for an export produced on `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("attendance-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::{at, record};

    fn parse_csv_record(line: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut buf = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '"' if in_quotes && chars.peek() == Some(&'"') => {
                    buf.push('"');
                    chars.next();
                }
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => out.push(std::mem::take(&mut buf)),
                _ => buf.push(ch),
            }
        }
        out.push(buf);
        out
    }

    fn sample() -> RecordCollection {
        vec![
            record("Ana Li", "S1", "", at(2026, 10, 19, 8, 55)),
            record("Ben", "S2", r#"He said "hi""#, at(2026, 10, 19, 9, 20)),
            record("Cy, Jr.", "S3", "late", at(2026, 10, 20, 7, 5)),
        ]
        .into()
    }

    #[test]
    fn test_render_view_formats_rows() {
        let view = render_view(&sample(), &DisplayConfig::default());
        let rows: Vec<_> = view.records().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].timestamp, "2026-10-19 08:55:00");
        assert_eq!(rows[0].name, "Ana Li");
        assert_eq!(rows[0].student_id, "S1");
        assert_eq!(rows[0].note, "-");
        assert_eq!(rows[2].note, "late");
        assert!(!view.is_placeholder());
    }

    #[test]
    fn test_render_view_empty_has_placeholder() {
        let view = render_view(&RecordCollection::new(), &DisplayConfig::default());
        assert!(view.is_placeholder());
        assert_eq!(view.rows(), &[ViewRow::Placeholder(NO_RECORDS)]);
        assert_eq!(view.records().count(), 0);
    }

    #[test]
    fn test_render_view_custom_display() {
        let display = DisplayConfig {
            timestamp_format: "%d/%m/%Y %H:%M".to_string(),
            empty_note_placeholder: "(none)".to_string(),
        };
        let view = render_view(&sample(), &display);
        let first = view.records().next().unwrap();
        assert_eq!(first.timestamp, "19/10/2026 08:55");
        assert_eq!(first.note, "(none)");
    }

    #[test]
    fn test_to_table_contains_header_and_rows() {
        let table = render_view(&sample(), &DisplayConfig::default()).to_table(false);
        let lines: Vec<_> = table.lines().collect();

        assert!(lines[0].starts_with("Date/Time"));
        assert!(lines[0].contains("Student ID"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("Ana Li"));
    }

    #[test]
    fn test_to_table_indexed() {
        let table = render_view(&sample(), &DisplayConfig::default()).to_table(true);
        let lines: Vec<_> = table.lines().collect();

        assert!(lines[0].starts_with('#'));
        assert!(lines[2].starts_with('0'));
        assert!(lines[4].starts_with('2'));
    }

    #[test]
    fn test_to_table_placeholder() {
        let table = render_view(&RecordCollection::new(), &DisplayConfig::default()).to_table(true);
        assert!(table.trim_end().ends_with(NO_RECORDS));
    }

    #[test]
    fn test_export_csv_header() {
        let csv = export_csv(&RecordCollection::new(), &DisplayConfig::default());
        assert_eq!(csv, r#""Date/Time","Name","Student ID","Note""#);
    }

    #[test]
    fn test_export_csv_escapes_quotes() {
        let csv = export_csv(&sample(), &DisplayConfig::default());
        let line = csv.lines().nth(2).unwrap();
        assert_eq!(
            line,
            r#""2026-10-19 09:20:00","Ben","S2","He said ""hi""""#
        );
    }

    #[test]
    fn test_export_csv_empty_note_stays_empty() {
        let csv = export_csv(&sample(), &DisplayConfig::default());
        assert!(csv.lines().nth(1).unwrap().ends_with(r#","S1","""#));
    }

    #[test]
    fn test_export_csv_round_trip() {
        let display = DisplayConfig::default();
        let records = sample();
        let csv = export_csv(&records, &display);

        let mut lines = csv.lines();
        assert_eq!(parse_csv_record(lines.next().unwrap()), COLUMNS.to_vec());

        let parsed: Vec<Vec<String>> = lines.map(parse_csv_record).collect();
        assert_eq!(parsed.len(), records.len());

        for (fields, record) in parsed.iter().zip(&records) {
            let row = display_row(record, &display);
            assert_eq!(fields[0], row.timestamp);
            assert_eq!(fields[1], record.name);
            assert_eq!(fields[2], record.student_id);
            assert_eq!(fields[3], record.note);
        }
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(export_filename(date), "attendance-2026-03-07.csv");
    }
}
