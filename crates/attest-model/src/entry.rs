//! Test entry records

use attest_util::EntryId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of one product test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    Pass,
    Fail,
    #[default]
    Pending,
}

impl TestResult {
    /// Upper-case label used in reports and exports
    pub fn label(&self) -> &'static str {
        match self {
            TestResult::Pass => "PASS",
            TestResult::Fail => "FAIL",
            TestResult::Pending => "PENDING",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass" => Ok(TestResult::Pass),
            "fail" => Ok(TestResult::Fail),
            "pending" => Ok(TestResult::Pending),
            other => Err(format!("unknown test result: {}", other)),
        }
    }
}

/// All entry fields except identity and the derived total.
///
/// What the entry form collects; `append` turns a draft into a
/// `ProductEntry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub serial_number: String,
    pub product_name: String,
    pub series_name: String,
    pub rated_current: String,
    pub power_factor: String,
    pub on_time: String,
    pub off_time: String,
    pub cycles: u32,
    pub operations: u32,
    pub result: TestResult,
    pub remarks: String,
    /// Defaults to the creation date when absent
    pub test_date: Option<NaiveDate>,
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self {
            serial_number: String::new(),
            product_name: String::new(),
            series_name: String::new(),
            rated_current: String::new(),
            power_factor: String::new(),
            on_time: String::new(),
            off_time: String::new(),
            cycles: 1,
            operations: 1,
            result: TestResult::Pending,
            remarks: String::new(),
            test_date: None,
        }
    }
}

/// One recorded product test result.
///
/// Immutable once created; the store only appends and removes whole
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: EntryId,
    pub serial_number: String,
    pub product_name: String,
    pub series_name: String,
    pub rated_current: String,
    pub power_factor: String,
    pub on_time: String,
    pub off_time: String,
    pub cycles: u32,
    pub operations: u32,
    /// `cycles * operations`, fixed at creation
    pub total_operations: u64,
    pub result: TestResult,
    pub remarks: String,
    pub test_date: NaiveDate,
}

impl ProductEntry {
    /// Build an entry from a draft, assigning identity and computing the
    /// derived total. `default_date` fills in a missing test date.
    pub fn from_draft(id: EntryId, draft: EntryDraft, default_date: NaiveDate) -> Self {
        let total_operations = u64::from(draft.cycles) * u64::from(draft.operations);
        Self {
            id,
            serial_number: draft.serial_number,
            product_name: draft.product_name,
            series_name: draft.series_name,
            rated_current: draft.rated_current,
            power_factor: draft.power_factor,
            on_time: draft.on_time,
            off_time: draft.off_time,
            cycles: draft.cycles,
            operations: draft.operations,
            total_operations,
            result: draft.result,
            remarks: draft.remarks,
            test_date: draft.test_date.unwrap_or(default_date),
        }
    }

    pub fn has_remarks(&self) -> bool {
        !self.remarks.trim().is_empty()
    }
}
