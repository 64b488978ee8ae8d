//! Input ingestion: reading, normalizing and validating the attendance file.

pub mod dates;
pub mod loader;
pub mod normalizer;
pub mod reader;
pub mod validator;

pub use loader::{DatasetLoader, REQUIRED_COLUMNS};
pub use normalizer::{EmailRules, Normalizer};
pub use validator::{ValidationError, ValidationIssue, validate_dataset, validate_row};

use thiserror::Error;

/// How many row errors a load failure message lists before summarizing.
pub const ERROR_EXCERPT_LEN: usize = 5;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error reading input file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Unsupported input format '{0}': use .xlsx, .xls, .ods or .csv")]
    UnsupportedFormat(String),

    #[error("The input file has no header row")]
    EmptySheet,

    #[error("Missing columns in input file: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid training paths: {}", .0.join(", "))]
    UnknownCategories(Vec<String>),

    #[error("{}", validation_summary(.0))]
    Invalid(Vec<ValidationError>),
}

impl LoadError {
    /// Short code stored in the activity log.
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Read { .. } | LoadError::UnsupportedFormat(_) | LoadError::EmptySheet => {
                "LOAD-READ"
            }
            LoadError::MissingColumns(_) => "LOAD-COLUMNS",
            LoadError::UnknownCategories(_) => "LOAD-CATEGORY",
            LoadError::Invalid(_) => "LOAD-VALIDATION",
        }
    }
}

/// First few row errors, a count of the rest and remediation hints.
pub fn validation_summary(errors: &[ValidationError]) -> String {
    let mut out = format!(
        "The file contains {} rows with validation errors:",
        errors.len()
    );

    for e in errors.iter().take(ERROR_EXCERPT_LEN) {
        out.push_str(&format!("\n  - {e}"));
    }

    if errors.len() > ERROR_EXCERPT_LEN {
        out.push_str(&format!(
            "\n  ... and {} more rows with errors",
            errors.len() - ERROR_EXCERPT_LEN
        ));
    }

    out.push_str(
        "\nHints:\
         \n  - use '--' for intentionally empty optional fields (aula, dipartimento, indirizzo, classe_concorso)\
         \n  - times may be written as HH:MM, HH:MM:SS, HH.MM or HHMM (e.g. 09:00, 09:00:00, 9.00, 900)",
    );
    out
}
