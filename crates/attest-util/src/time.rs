//! Time helpers for report stamping
//!
//! Calendar dates only: entries carry a test date, settings carry the
//! report issue date, and file names carry the export date. Nothing in
//! the system needs sub-day precision.

use chrono::{Datelike, Local, NaiveDate};

/// The current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as the compact `YYYYMMDD` segment used in report numbers.
pub fn format_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Format a date as ISO `YYYY-MM-DD`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Day / month-name / year breakout for the report header date boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    /// Zero-padded day of month, e.g. "05"
    pub day: String,
    /// Full English month name, e.g. "August"
    pub month: String,
    /// Four-digit year, e.g. "2026"
    pub year: String,
}

pub fn date_parts(date: NaiveDate) -> DateParts {
    DateParts {
        day: format!("{:02}", date.day()),
        month: date.format("%B").to_string(),
        year: date.format("%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(format_compact(date), "20260805");
    }

    #[test]
    fn iso_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(format_iso(date), "2026-08-05");
    }

    #[test]
    fn parts_breakout() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let parts = date_parts(date);
        assert_eq!(parts.day, "05");
        assert_eq!(parts.month, "August");
        assert_eq!(parts.year, "2026");
    }

    #[test]
    fn today_is_reasonable() {
        let t = today();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }
}
