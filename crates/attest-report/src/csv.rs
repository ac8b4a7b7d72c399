//! CSV export renderer
//!
//! Plain comma-joined rows. The free-text columns (product name,
//! series name, remarks) are always quoted, with embedded quotes
//! doubled; every other column is emitted bare. The `csv` crate cannot
//! express that mixed per-column policy, so the rows are assembled by
//! hand.

use attest_config::ReportSettings;
use attest_model::ProductEntry;
use chrono::NaiveDate;
use tracing::debug;

use crate::{RenderError, RenderResult};

/// Fixed header row: the entry fields in order, with the derived total
/// included and the identifier excluded.
pub const CSV_HEADERS: [&str; 13] = [
    "Serial Number",
    "Test Date",
    "Product Name",
    "Series Name",
    "Rated Current",
    "Power Factor",
    "On Time",
    "Off Time",
    "Cycles",
    "Operations",
    "Total Operations",
    "Result",
    "Remarks",
];

/// A rendered CSV artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn row(entry: &ProductEntry) -> String {
    [
        entry.serial_number.clone(),
        attest_util::format_iso(entry.test_date),
        quoted(&entry.product_name),
        quoted(&entry.series_name),
        entry.rated_current.clone(),
        entry.power_factor.clone(),
        entry.on_time.clone(),
        entry.off_time.clone(),
        entry.cycles.to_string(),
        entry.operations.to_string(),
        entry.total_operations.to_string(),
        entry.result.label().to_string(),
        quoted(&entry.remarks),
    ]
    .join(",")
}

/// Render the CSV export: one header line plus one line per entry, in
/// store order. `export_date` goes into the file name only.
pub fn render_csv(
    entries: &[ProductEntry],
    settings: &ReportSettings,
    export_date: NaiveDate,
) -> RenderResult<CsvExport> {
    if entries.is_empty() {
        return Err(RenderError::NoEntries);
    }

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    lines.extend(entries.iter().map(row));

    let file_name = format!(
        "{}_Test_Data_{}.csv",
        attest_util::collapse_whitespace(&settings.company_name),
        attest_util::format_iso(export_date)
    );

    debug!(rows = entries.len(), file_name = %file_name, "CSV rendered");
    Ok(CsvExport {
        file_name,
        content: lines.join("\n"),
    })
}
