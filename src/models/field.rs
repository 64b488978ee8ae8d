use serde::{Serialize, Serializer};
use std::fmt;

/// Sentinel used in the input file for an intentionally empty optional cell.
pub const SENTINEL: &str = "--";

/// One column of the input spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    Date,
    StartTime,
    EndTime,
    Room,
    Department,
    Address,
    LessonType,
    Category,
    CompetitionClass,
    Email,
}

impl Field {
    /// Required columns, in the order the template lays them out.
    pub const ALL: [Field; 11] = [
        Field::FullName,
        Field::Date,
        Field::StartTime,
        Field::EndTime,
        Field::Room,
        Field::Department,
        Field::Address,
        Field::LessonType,
        Field::Category,
        Field::CompetitionClass,
        Field::Email,
    ];

    /// Fields that must carry a real value on every row.
    pub const ESSENTIAL: [Field; 7] = [
        Field::FullName,
        Field::Date,
        Field::StartTime,
        Field::EndTime,
        Field::LessonType,
        Field::Category,
        Field::Email,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Field::FullName => "nome_cognome",
            Field::Date => "data",
            Field::StartTime => "ora_inizio",
            Field::EndTime => "ora_fine",
            Field::Room => "aula",
            Field::Department => "dipartimento",
            Field::Address => "indirizzo",
            Field::LessonType => "tipo_lezione",
            Field::Category => "tipo_percorso",
            Field::CompetitionClass => "classe_concorso",
            Field::Email => "email",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.column() == name.trim())
    }

    /// Optional fields accept blank cells and the `--` sentinel.
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            Field::Room | Field::Department | Field::Address | Field::CompetitionClass
        )
    }

    pub fn is_time(&self) -> bool {
        matches!(self, Field::StartTime | Field::EndTime)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.column())
    }
}

/// True when a cell counts as "not provided": blank or the `--` sentinel.
pub fn is_blank_or_sentinel(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == SENTINEL
}
