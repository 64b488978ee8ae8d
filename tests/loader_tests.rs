use rattestati::ingest::{DatasetLoader, LoadError, validate_dataset};
use rattestati::models::Field;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

mod common;
use common::{HEADER, valid_row, write_csv, write_xlsx};

fn loader() -> DatasetLoader {
    DatasetLoader::default()
}

#[test]
fn loads_a_valid_xlsx() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("presenze.xlsx");

    let mut second = valid_row("Anna Verdi", "Anna Verdi <anna.verdi@example.com>");
    second[2] = "14.30".to_string();
    second[3] = "1630".to_string();
    second[4] = "--".to_string();
    second[8] = "PeF30 CFU".to_string();

    write_xlsx(
        &path,
        &HEADER,
        &[valid_row("Mario Rossi", "mario.rossi@example.com"), second],
    );

    let dataset = loader().load(&path).unwrap();
    assert_eq!(dataset.len(), 2);

    let anna = &dataset.rows()[1];
    assert_eq!(anna.row, 3);
    assert_eq!(anna.record.email, "anna.verdi@example.com");
    assert_eq!(anna.record.start_time, "14:30");
    assert_eq!(anna.record.end_time, "16:30");
    assert_eq!(anna.record.details.room, "");
    assert_eq!(anna.record.category, "PeF30 CFU all.2");
}

#[test]
fn csv_with_semicolons_and_iso_dates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("presenze.csv");
    let mut rows = vec![
        valid_row("Mario Rossi", "mario@example.com"),
        valid_row("Luca Bianchi", "luca@example.com"),
    ];
    rows[0][1] = "2025-03-15".to_string();
    rows[1][1] = "16/03/2025".to_string();

    let mut text = HEADER.join(";");
    text.push('\n');
    for r in &rows {
        text.push_str(&r.join(";"));
        text.push('\n');
    }
    std::fs::write(&path, text).unwrap();

    let dataset = loader().load(&path).unwrap();
    let dates: Vec<&str> = dataset.records().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["15/03/2025", "16/03/2025"]);
}

#[test]
fn missing_column_is_named() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("senza_email.csv");
    let header: Vec<&str> = HEADER.iter().copied().filter(|h| *h != "email").collect();
    let mut row = valid_row("Mario Rossi", "x");
    row.pop();
    write_csv(&path, &header, &[row]);

    match loader().load(&path) {
        Err(LoadError::MissingColumns(cols)) => assert_eq!(cols, vec!["email".to_string()]),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn unknown_category_rejects_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("percorsi.csv");
    let mut row = valid_row("Mario Rossi", "mario@example.com");
    row[8] = "Master II livello".to_string();
    write_csv(&path, &HEADER, &[row.clone(), row]);

    let err = loader().load(&path).unwrap_err();
    assert_eq!(err.to_string(), "Invalid training paths: Master II livello");
    assert_eq!(err.code(), "LOAD-CATEGORY");
}

#[test]
fn invalid_rows_reject_everything_with_row_numbers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("errori.csv");
    let mut bad = valid_row("Luca Bianchi", "luca@example.com");
    bad[3] = "25:99".to_string();
    let mut blank_name = valid_row("", "anna@example.com");
    blank_name[0] = "--".to_string();

    write_csv(
        &path,
        &HEADER,
        &[valid_row("Mario Rossi", "mario@example.com"), bad, blank_name],
    );

    match loader().load(&path) {
        Err(LoadError::Invalid(errors)) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].row, 3);
            assert_eq!(errors[0].fields(), vec![Field::EndTime]);
            assert_eq!(errors[1].row, 4);
            assert_eq!(errors[1].fields(), vec![Field::FullName]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn summary_lists_five_errors_then_counts_the_rest() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("molti.csv");
    let rows: Vec<Vec<String>> = (0..8)
        .map(|i| valid_row(&format!("Persona {i}"), "sbagliata"))
        .collect();
    write_csv(&path, &HEADER, &rows);

    let msg = loader().load(&path).unwrap_err().to_string();
    assert!(msg.contains("Row 2: Invalid email address: sbagliata"));
    assert!(msg.contains("Row 6:"));
    assert!(!msg.contains("Row 7:"));
    assert!(msg.contains("... and 3 more rows with errors"));
    assert!(msg.contains("'--'"));
}

#[test]
fn blank_lines_keep_original_row_numbers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("buchi.xlsx");
    let empty = vec![String::new(); 11];
    let mut bad = valid_row("Luca Bianchi", "luca@example.com");
    bad[2] = "mattina".to_string();
    write_xlsx(
        &path,
        &HEADER,
        &[valid_row("Mario Rossi", "mario@example.com"), empty, bad],
    );

    match loader().load(&path) {
        Err(LoadError::Invalid(errors)) => assert_eq!(errors[0].row, 4),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("presenze.txt");
    std::fs::write(&path, "x").unwrap();
    assert!(matches!(
        loader().load(&path),
        Err(LoadError::UnsupportedFormat(_))
    ));
}

#[test]
fn loading_twice_gives_the_same_dataset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stabile.csv");
    write_csv(
        &path,
        &HEADER,
        &[
            valid_row("Mario Rossi", "mario@example.com"),
            valid_row("Anna Verdi", "av.verdi@stud.uniroma3.it"),
        ],
    );
    assert_eq!(loader().load(&path).unwrap(), loader().load(&path).unwrap());
}

#[test]
fn loaded_dataset_passes_validation_again() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rilettura.csv");
    let mut second = valid_row("Emmanuel Losio", "Emm Losio emm.losio@stud.uniroma3.it");
    second[2] = "9.30".to_string();
    second[3] = "11:30:00".to_string();
    second[8] = "PeF30 CFU all.2 art. 13".to_string();
    write_csv(
        &path,
        &HEADER,
        &[valid_row("Mario Rossi", "mario@example.com"), second],
    );

    let loader = loader();
    let dataset = loader.load(&path).unwrap();
    assert!(validate_dataset(&dataset, loader.email_rules()).is_empty());
}

#[test]
fn numeric_dotted_times_in_xlsx() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orari.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in HEADER.iter().enumerate() {
        sheet.write(0, c as u16, *h).unwrap();
    }
    for (c, v) in valid_row("Mario Rossi", "mario.rossi@example.com")
        .iter()
        .enumerate()
    {
        if c != 2 && c != 3 {
            sheet.write(1, c as u16, v.as_str()).unwrap();
        }
    }
    sheet.write_number(1, 2, 14.30).unwrap();
    sheet.write_number(1, 3, 16.30).unwrap();
    workbook.save(&path).unwrap();

    let dataset = loader().load(&path).unwrap();
    let record = &dataset.rows()[0].record;
    assert_eq!(record.start_time, "14:30");
    assert_eq!(record.end_time, "16:30");
}

#[test]
fn row_numbers_count_blank_rows_above_the_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spostato.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in HEADER.iter().enumerate() {
        sheet.write(2, c as u16, *h).unwrap();
    }
    for (c, v) in valid_row("Mario Rossi", "non-valida").iter().enumerate() {
        sheet.write(3, c as u16, v.as_str()).unwrap();
    }
    workbook.save(&path).unwrap();

    match loader().load(&path) {
        Err(LoadError::Invalid(errors)) => assert_eq!(errors[0].row, 4),
        other => panic!("unexpected result: {other:?}"),
    }
}
