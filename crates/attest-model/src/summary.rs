//! Report-level summaries derived from the entry list

use crate::{ProductEntry, TestResult};
use std::fmt;

/// Overall verdict printed in the report summary band.
///
/// `Pass` only when every entry passed; a single FAIL or PENDING entry
/// makes the whole report `Mixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallResult {
    Pass,
    Mixed,
}

impl fmt::Display for OverallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallResult::Pass => f.write_str("PASS"),
            OverallResult::Mixed => f.write_str("MIXED"),
        }
    }
}

pub fn overall_result(entries: &[ProductEntry]) -> OverallResult {
    if passed_count(entries) == entries.len() {
        OverallResult::Pass
    } else {
        OverallResult::Mixed
    }
}

/// Number of entries with a PASS result
pub fn passed_count(entries: &[ProductEntry]) -> usize {
    entries
        .iter()
        .filter(|e| e.result == TestResult::Pass)
        .count()
}
