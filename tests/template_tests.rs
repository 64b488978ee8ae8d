use chrono::NaiveDate;
use rattestati::ingest::DatasetLoader;
use rattestati::models::{DispatchOutcome, DispatchReport, OutcomeStatus};
use rattestati::report::write_report;
use rattestati::template::{TemplateKind, write_template};
use std::path::PathBuf;
use tempfile::tempdir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 17).unwrap()
}

#[test]
fn every_template_kind_loads_cleanly() {
    let dir = tempdir().unwrap();
    for (kind, records, expected) in [
        (TemplateKind::Minimal, 8, 3),
        (TemplateKind::Base, 8, 8),
        (TemplateKind::Full, 12, 12),
    ] {
        let path = dir.path().join(format!("{kind:?}.xlsx"));
        assert_eq!(write_template(&path, kind, records, today()).unwrap(), expected);

        let dataset = DatasetLoader::default().load(&path).unwrap();
        assert_eq!(dataset.len(), expected, "{kind:?}");
    }
}

#[test]
fn full_template_normalizes_its_variations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("full.xlsx");
    write_template(&path, TemplateKind::Full, 6, today()).unwrap();

    let dataset = DatasetLoader::default().load(&path).unwrap();
    let second = &dataset.rows()[1].record;
    assert_eq!(second.start_time, "14:30");
    assert_eq!(second.end_time, "16:30");
    assert_eq!(second.email, "ut.utente2@stud.uniroma3.it");

    let third = &dataset.rows()[2].record;
    assert_eq!(third.details.room, "");
}

fn report() -> DispatchReport {
    let mut r = DispatchReport::default();
    r.push(DispatchOutcome {
        row: 2,
        name: "Mario Rossi".into(),
        email: "mario@example.com".into(),
        status: OutcomeStatus::Sent,
        message: "Certificate for Mario Rossi generated successfully and sent to mario@example.com".into(),
        artifact: Some(PathBuf::from("/tmp/attestato_Mario_Rossi_15-03-2025.pdf")),
    });
    r.push(DispatchOutcome {
        row: 3,
        name: "Anna Verdi".into(),
        email: "x".into(),
        status: OutcomeStatus::RowInvalid,
        message: "Error in row 3 (Anna Verdi): Invalid email address: x".into(),
        artifact: None,
    });
    r
}

#[test]
fn report_as_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("esiti.csv");
    write_report(&path, &report()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("row,name,email,status,message,file"));
    assert!(lines.next().unwrap().starts_with("2,Mario Rossi,mario@example.com,sent,"));
    assert!(lines.next().unwrap().contains("row_invalid"));
}

#[test]
fn report_as_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("esiti.json");
    write_report(&path, &report()).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["success_count"], 1);
    assert_eq!(value["error_count"], 1);
    assert_eq!(value["outcomes"][1]["status"], "row_invalid");
}
