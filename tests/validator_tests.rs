use rattestati::ingest::validator::{parse_time_shape, record_issues};
use rattestati::ingest::{EmailRules, validate_dataset, validate_row};
use rattestati::models::{Dataset, DatasetRow, Field};

mod common;
use common::record;

fn rules() -> EmailRules {
    EmailRules::default()
}

#[test]
fn complete_record_passes() {
    let r = record("Mario Rossi", "mario.rossi@example.com");
    assert!(validate_row(&r, &rules()).is_ok());
    assert!(record_issues(&r, &rules()).is_empty());
}

#[test]
fn first_missing_essential_field_is_reported() {
    let mut r = record("Mario Rossi", "--");
    r.lesson_type = "  ".to_string();
    let issue = validate_row(&r, &rules()).unwrap_err();
    assert_eq!(issue.field, Field::LessonType);
    assert_eq!(issue.message, "Field 'tipo_lezione' is missing or empty");
}

#[test]
fn email_is_checked_before_times() {
    let mut r = record("Mario Rossi", "not-an-email");
    r.start_time = "25:99".to_string();
    let issue = validate_row(&r, &rules()).unwrap_err();
    assert_eq!(issue.message, "Invalid email address: not-an-email");
}

#[test]
fn impossible_time_is_rejected() {
    let mut r = record("Mario Rossi", "mario@example.com");
    r.end_time = "25:99".to_string();
    let issue = validate_row(&r, &rules()).unwrap_err();
    assert_eq!(issue.field, Field::EndTime);
    assert_eq!(
        issue.message,
        "Invalid end time format: 25:99 (expected HH:MM)"
    );
}

#[test]
fn every_accepted_shape_parses() {
    for raw in ["09:00", "9:00", "09:00:00", "9.00", "900", "0900"] {
        assert!(parse_time_shape(raw).is_some(), "{raw}");
    }
    for raw in ["24:00", "12:60", "nove", ""] {
        assert!(parse_time_shape(raw).is_none(), "{raw}");
    }
}

#[test]
fn end_before_start_is_a_dataset_error_only() {
    let mut r = record("Mario Rossi", "mario@example.com");
    r.start_time = "11:00".to_string();
    r.end_time = "09:00".to_string();

    // the dispatch-time check looks at shapes only
    assert!(validate_row(&r, &rules()).is_ok());

    let issues = record_issues(&r, &rules());
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].message,
        "End time (09:00) must be after start time (11:00)"
    );
}

#[test]
fn equal_times_are_rejected() {
    let mut r = record("Mario Rossi", "mario@example.com");
    r.end_time = r.start_time.clone();
    assert_eq!(record_issues(&r, &rules())[0].field, Field::EndTime);
}

#[test]
fn ordering_is_skipped_when_a_time_is_malformed() {
    let mut r = record("Mario Rossi", "mario@example.com");
    r.start_time = "mattina".to_string();
    r.end_time = "08:00".to_string();
    let issues = record_issues(&r, &rules());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field, Field::StartTime);
}

#[test]
fn dataset_report_collects_all_issues_per_row() {
    let mut bad = record("", "nope");
    bad.category = "Corso libero".to_string();

    let dataset = Dataset::new(vec![
        DatasetRow {
            row: 2,
            record: record("Mario Rossi", "mario@example.com"),
        },
        DatasetRow { row: 3, record: bad },
    ]);

    let errors = validate_dataset(&dataset, &rules());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row, 3);
    assert_eq!(
        errors[0].fields(),
        vec![Field::FullName, Field::Email, Field::Category]
    );
    assert!(errors[0].to_string().starts_with("Row 3: Field 'nome_cognome'"));
}
