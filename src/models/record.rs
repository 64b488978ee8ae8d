//! Attendance records and the dataset built from one input file.

use crate::models::field::Field;
use serde::Serialize;

/// Optional lesson details. Always normalized: a blank or `--` cell is "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LessonDetails {
    pub room: String,
    pub department: String,
    pub address: String,
    pub competition_class: String,
}

/// One attendee / lesson entry to certify.
///
/// The essential fields keep whatever the normalizer produced, so a row
/// with a missing name still builds a `Record` and is rejected by the
/// validator with a row-addressable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub full_name: String,
    /// DD/MM/YYYY once the loader could parse the date column.
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub lesson_type: String,
    pub category: String,
    pub email: String,
    pub details: LessonDetails,
}

impl Record {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Date => &self.date,
            Field::StartTime => &self.start_time,
            Field::EndTime => &self.end_time,
            Field::LessonType => &self.lesson_type,
            Field::Category => &self.category,
            Field::Email => &self.email,
            Field::Room => &self.details.room,
            Field::Department => &self.details.department,
            Field::Address => &self.details.address,
            Field::CompetitionClass => &self.details.competition_class,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::FullName => self.full_name = value,
            Field::Date => self.date = value,
            Field::StartTime => self.start_time = value,
            Field::EndTime => self.end_time = value,
            Field::LessonType => self.lesson_type = value,
            Field::Category => self.category = value,
            Field::Email => self.email = value,
            Field::Room => self.details.room = value,
            Field::Department => self.details.department = value,
            Field::Address => self.details.address = value,
            Field::CompetitionClass => self.details.competition_class = value,
        }
    }

    pub fn essential(&self) -> [(Field, &str); 7] {
        Field::ESSENTIAL.map(|f| (f, self.get(f)))
    }

    /// Name used in report lines; falls back to the email when blank.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            self.email.trim()
        } else {
            self.full_name.trim()
        }
    }
}

/// A record together with its spreadsheet line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetRow {
    /// 1-based, header-adjusted: the first data line is row 2.
    pub row: usize,
    pub record: Record,
}

/// Ordered, read-only result of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn new(rows: Vec<DatasetRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetRow> {
        self.rows.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter().map(|r| &r.record)
    }
}

/// Spreadsheet line number for a zero-based data row index.
pub fn display_row(index: usize) -> usize {
    index + 2
}
