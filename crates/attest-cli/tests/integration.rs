//! Integration tests for attest
//!
//! These exercise the whole pipeline the way the binary wires it up:
//! store on disk, sign-in gate, settings, batch ingestion, both
//! renderers.

use attest_config::{parse_batch, ReportSettings, TableTheme};
use attest_core::{Authenticator, EntryStore};
use attest_report::{render_csv, render_pdf, FixedSuffix};
use attest_store::{SqliteStore, Store, DEFAULT_PASSWORD, DEFAULT_USER_ID};
use attest_util::UserId;
use chrono::NaiveDate;
use std::sync::Arc;

const BATCH: &str = r#"
    batch_version = 1

    [[entries]]
    serial_number = "SN-001"
    product_name = "Contactor"
    series_name = "C-Series"
    rated_current = "25A"
    power_factor = "0.85"
    on_time = "2s"
    off_time = "3s"
    cycles = 2
    operations = 3
    result = "pass"
    test_date = "2026-08-20"

    [[entries]]
    serial_number = "SN-002"
    product_name = "Relay"
    series_name = "RX"
    cycles = 10
    operations = 5
    result = "fail"
    remarks = "contact chatter at cycle 7"
    test_date = "2026-08-21"
"#;

fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
}

fn ingest(batch: &str) -> EntryStore {
    let mut store = EntryStore::new();
    for draft in parse_batch(batch).unwrap() {
        store.append(draft);
    }
    store
}

#[test]
fn sign_in_gate_over_disk_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("attest.db");

    {
        let store: Arc<dyn Store> = Arc::new(SqliteStore::open(&db_path).unwrap());
        let auth = Authenticator::new(store);

        assert_eq!(auth.current_user().unwrap(), None);
        auth.sign_in(&UserId::new(DEFAULT_USER_ID), DEFAULT_PASSWORD)
            .unwrap();
    }

    // The session survives a reopen, like a new CLI invocation.
    let store: Arc<dyn Store> = Arc::new(SqliteStore::open(&db_path).unwrap());
    let auth = Authenticator::new(store);
    assert_eq!(
        auth.current_user().unwrap(),
        Some(UserId::new(DEFAULT_USER_ID))
    );
}

#[test]
fn settings_survive_reopen_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("attest.db");

    {
        let store = SqliteStore::open(&db_path).unwrap();
        let mut settings = ReportSettings::default();
        settings.company_name = "Acme Test Labs".into();
        settings.table_theme = TableTheme::Grid;
        store.save_settings(&settings).unwrap();
    }

    let store = SqliteStore::open(&db_path).unwrap();
    let settings = store.load_settings().unwrap().unwrap();
    assert_eq!(settings.company_name, "Acme Test Labs");
    assert_eq!(settings.table_theme, TableTheme::Grid);
}

#[test]
fn batch_to_csv_pipeline() {
    let entries = ingest(BATCH);
    assert_eq!(entries.len(), 2);

    let mut settings = ReportSettings::default();
    settings.company_name = "Acme Test Labs".into();

    let export = render_csv(entries.list(), &settings, export_date()).unwrap();
    assert_eq!(export.file_name, "Acme_Test_Labs_Test_Data_2026-08-25.csv");

    let lines: Vec<&str> = export.content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("SN-001,2026-08-20,"));
    assert!(lines[1].contains(",2,3,6,PASS,"));
    assert!(lines[2].contains(",10,5,50,FAIL,"));
}

#[test]
fn batch_to_pdf_pipeline() {
    let entries = ingest(BATCH);

    let mut settings = ReportSettings::default();
    settings.company_name = "Acme Test Labs".into();
    settings.report_date = export_date();

    let report = render_pdf(entries.list(), &settings, &mut FixedSuffix(4821)).unwrap();
    assert!(report.bytes.starts_with(b"%PDF"));
    assert_eq!(report.report_number.as_str(), "RPT-20260825-4821");
    assert_eq!(
        report.file_name,
        "Acme_Test_Labs_Report_RPT-20260825-4821.pdf"
    );
}

#[test]
fn empty_batch_blocks_export() {
    let entries = ingest("batch_version = 1");
    assert!(entries.is_empty());

    let settings = ReportSettings::default();
    assert!(render_csv(entries.list(), &settings, export_date()).is_err());
    assert!(render_pdf(entries.list(), &settings, &mut FixedSuffix(1000)).is_err());
}

#[test]
fn artifacts_can_be_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let entries = ingest(BATCH);
    let mut settings = ReportSettings::default();
    settings.report_date = export_date();

    let report = render_pdf(entries.list(), &settings, &mut FixedSuffix(1000)).unwrap();
    let pdf_path = dir.path().join(&report.file_name);
    std::fs::write(&pdf_path, &report.bytes).unwrap();

    let export = render_csv(entries.list(), &settings, export_date()).unwrap();
    let csv_path = dir.path().join(&export.file_name);
    std::fs::write(&csv_path, &export.content).unwrap();

    assert!(pdf_path.exists());
    assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), export.content);
}
