//! End-to-end ingestion of one input file into a [`Dataset`].

use crate::ingest::LoadError;
use crate::ingest::dates::{DateStrategy, normalize_date_column};
use crate::ingest::normalizer::{EmailRules, Normalizer};
use crate::ingest::reader::{RawTable, read_table};
use crate::ingest::validator::validate_dataset;
use crate::models::record::display_row;
use crate::models::{Dataset, DatasetRow, Field, Record, TrainingPath};
use std::path::Path;

pub const REQUIRED_COLUMNS: [&str; 11] = [
    "nome_cognome",
    "data",
    "ora_inizio",
    "ora_fine",
    "aula",
    "dipartimento",
    "indirizzo",
    "tipo_lezione",
    "tipo_percorso",
    "classe_concorso",
    "email",
];

/// All-or-nothing loader: either every row is valid or nothing is returned.
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    normalizer: Normalizer,
}

impl DatasetLoader {
    pub fn new(email_rules: EmailRules) -> Self {
        Self {
            normalizer: Normalizer::new(email_rules),
        }
    }

    pub fn email_rules(&self) -> &EmailRules {
        self.normalizer.email_rules()
    }

    pub fn load(&self, path: &Path) -> Result<Dataset, LoadError> {
        let table = read_table(path)?;
        self.load_table(&table)
    }

    /// Same pipeline as [`load`](Self::load), starting from an in-memory table.
    pub fn load_table(&self, table: &RawTable) -> Result<Dataset, LoadError> {
        // 1️⃣ schema
        let missing = table.missing_columns(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        // 2️⃣ cell normalization
        let mut rows = self.normalize_rows(table);

        // 3️⃣ date column
        let mut dates: Vec<String> = rows.iter().map(|r| r.record.date.clone()).collect();
        if normalize_date_column(&mut dates) != DateStrategy::Raw {
            for (row, date) in rows.iter_mut().zip(dates) {
                row.record.date = date;
            }
        }

        // 4️⃣ training paths
        let unknown = unknown_categories(&rows);
        if !unknown.is_empty() {
            return Err(LoadError::UnknownCategories(unknown));
        }

        // 5️⃣ row validation
        let dataset = Dataset::new(rows);
        let errors = validate_dataset(&dataset, self.email_rules());
        if !errors.is_empty() {
            return Err(LoadError::Invalid(errors));
        }

        log::info!("Loaded {} records", dataset.len());
        Ok(dataset)
    }

    fn normalize_rows(&self, table: &RawTable) -> Vec<DatasetRow> {
        let columns: Vec<(Field, Option<usize>)> = Field::ALL
            .iter()
            .map(|f| (*f, table.column_index(f.column())))
            .collect();

        table
            .rows
            .iter()
            .map(|raw| {
                let mut record = Record::default();
                for (field, col) in &columns {
                    let value = col.and_then(|c| raw.cell(c));
                    if let Some(v) = self.normalizer.normalize(value, *field) {
                        record.set(*field, v);
                    }
                }
                DatasetRow {
                    row: display_row(raw.index),
                    record,
                }
            })
            .collect()
    }
}

/// Distinct unrecognized categories, in order of first appearance.
fn unknown_categories(rows: &[DatasetRow]) -> Vec<String> {
    let mut unknown: Vec<String> = Vec::new();
    for r in rows {
        let raw = r.record.category.trim();
        if raw.is_empty() || raw == crate::models::field::SENTINEL {
            continue;
        }
        if TrainingPath::parse(raw).is_none() && !unknown.iter().any(|u| u == raw) {
            unknown.push(raw.to_string());
        }
    }
    unknown
}
