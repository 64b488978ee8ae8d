//! Sample input workbook generator.

use crate::errors::{AppError, AppResult};
use crate::ingest::dates::DISPLAY_FORMAT;
use crate::models::{Field, SENTINEL, TrainingPath};
use crate::ui::messages::success;
use crate::utils::fs::ensure_parent;
use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Note, Workbook};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_RECORDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateKind {
    /// Three fixed example rows.
    #[value(alias = "minimo")]
    Minimal,
    /// N rows rotating paths and time slots.
    Base,
    /// N rows that also exercise institutional emails, alternate time
    /// shapes and `--` in optional cells.
    #[value(alias = "completo")]
    Full,
}

const PATHS: [TrainingPath; 4] = TrainingPath::ALL;
const LESSONS: [&str; 4] = ["Didattica generale", "Pedagogia", "Metodologie", "Psicologia"];
const DEPARTMENT: &str = "Scienze della Formazione";
const ADDRESS: &str = "Via del Castro Pretorio 20, Roma";

/// Header notes, by column.
const NOTES: &[(Field, &str)] = &[
    (Field::FullName, "Nome e cognome del partecipante"),
    (Field::Date, "Formato data: GG/MM/AAAA (es. 15/05/2025)"),
    (Field::StartTime, "Formato ora: HH:MM (es. 09:00)"),
    (Field::EndTime, "Formato ora: HH:MM (es. 11:00)"),
    (Field::Room, "Facoltativo: lasciare vuoto o scrivere --"),
    (
        Field::Category,
        "Uno tra: \"PeF60 CFU\", \"PeF30 CFU all.2\", \"PeF36 CFU\", \"PeF30 CFU (art. 13)\"",
    ),
    (Field::Email, "Indirizzo email valido"),
];

/// Sample rows in column order.
pub fn sample_rows(kind: TemplateKind, records: usize, today: NaiveDate) -> Vec<[String; 11]> {
    match kind {
        TemplateKind::Minimal => minimal_rows(today),
        TemplateKind::Base => (0..records).map(|i| base_row(i, today)).collect(),
        TemplateKind::Full => (0..records).map(|i| full_row(i, today)).collect(),
    }
}

fn minimal_rows(today: NaiveDate) -> Vec<[String; 11]> {
    let people = [
        ("Mario Rossi", "09:00", "11:00", "A1", "A-01", "mario.rossi@esempio.com"),
        ("Anna Verdi", "14:00", "16:00", "B2", "A-12", "anna.verdi@esempio.com"),
        ("Luca Bianchi", "11:00", "13:00", "C3", "A-25", "luca.bianchi@esempio.com"),
    ];

    people
        .iter()
        .enumerate()
        .map(|(i, (name, start, end, room, class, email))| {
            [
                name.to_string(),
                day(today, i),
                start.to_string(),
                end.to_string(),
                room.to_string(),
                DEPARTMENT.to_string(),
                ADDRESS.to_string(),
                LESSONS[i % LESSONS.len()].to_string(),
                PATHS[i % 3].label().to_string(),
                class.to_string(),
                email.to_string(),
            ]
        })
        .collect()
}

fn base_row(i: usize, today: NaiveDate) -> [String; 11] {
    let (start, end) = slot(i);
    [
        format!("Nome Cognome {}", i + 1),
        day(today, i),
        start.to_string(),
        end.to_string(),
        format!("Aula {}", i % 5 + 1),
        DEPARTMENT.to_string(),
        ADDRESS.to_string(),
        LESSONS[i % LESSONS.len()].to_string(),
        PATHS[i % PATHS.len()].label().to_string(),
        format!("A-{:02}", i % 30 + 1),
        format!("utente{}@esempio.com", i + 1),
    ]
}

fn full_row(i: usize, today: NaiveDate) -> [String; 11] {
    let mut row = base_row(i, today);

    // lezione telematica: niente aula né indirizzo
    if i % 3 == 2 {
        row[4] = SENTINEL.to_string();
        row[5] = SENTINEL.to_string();
        row[6] = SENTINEL.to_string();
    }
    if i % 4 == 1 {
        row[2] = row[2].replace(':', ".");
        row[3] = format!("{}:00", row[3]);
    }
    if i % 2 == 1 {
        row[10] = format!(
            "Contatto: ut.utente{}@stud.uniroma3.it (istituzionale)",
            i + 1
        );
    }
    row
}

fn day(today: NaiveDate, offset: usize) -> String {
    (today - Duration::days(offset as i64))
        .format(DISPLAY_FORMAT)
        .to_string()
}

fn slot(i: usize) -> (&'static str, &'static str) {
    if i % 2 == 0 {
        ("09:00", "11:00")
    } else {
        ("14:30", "16:30")
    }
}

/// Write the template workbook with a styled, frozen header row.
pub fn write_template(
    path: &Path,
    kind: TemplateKind,
    records: usize,
    today: NaiveDate,
) -> AppResult<usize> {
    let rows = sample_rows(kind, records, today);
    ensure_parent(path)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    let mut widths: Vec<usize> = Field::ALL
        .iter()
        .map(|f| UnicodeWidthStr::width(f.column()))
        .collect();

    for (col, field) in Field::ALL.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, field.column(), &header_format)?;
    }
    for (field, text) in NOTES {
        if let Some(col) = Field::ALL.iter().position(|f| f == field) {
            worksheet.insert_note(0, col as u16, &Note::new(*text))?;
        }
    }
    worksheet.set_freeze_panes(1, 0)?;

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    for (i, row) in rows.iter().enumerate() {
        let bg = if i % 2 == 0 { band1 } else { band2 };
        let fmt = Format::new()
            .set_background_color(bg)
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);

        for (col, value) in row.iter().enumerate() {
            worksheet.write_with_format((i + 1) as u32, col as u16, value.as_str(), &fmt)?;
            widths[col] = widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in widths.iter().enumerate() {
        worksheet.set_column_width(c as u16, *w as f64 + 2.0)?;
    }

    let target = path
        .to_str()
        .ok_or_else(|| AppError::Other(format!("invalid path: {}", path.display())))?;
    workbook.save(target)?;

    success(format!(
        "Template written: {} ({} rows)",
        path.display(),
        rows.len()
    ));
    Ok(rows.len())
}
