//! Business-rule validation of records.
//!
//! `validate_row` is the fast dispatch-time check and stops at the first
//! problem. `validate_dataset` runs the same checks plus the cross-field
//! ones and collects every problem of every row.

use crate::ingest::normalizer::{EmailRules, normalize_time};
use crate::models::field::{Field, is_blank_or_sentinel};
use crate::models::{Dataset, Record, TrainingPath};
use chrono::NaiveTime;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static CANONICAL_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("valid regex"));

/// One problem found on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: Field,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: Field, message: String) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// All problems of one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// 1-based, header-adjusted row number.
    pub row: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<Field> {
        self.issues.iter().map(|i| i.field).collect()
    }

    /// Issues joined into one line.
    pub fn message(&self) -> String {
        self.issues
            .iter()
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message())
    }
}

/// Parse any accepted time shape (`HH:MM`, `HH:MM:SS`, `HH.MM`, `HMM`,
/// `HHMM`) with valid hour and minute ranges.
pub fn parse_time_shape(raw: &str) -> Option<NaiveTime> {
    let canonical = normalize_time(raw);
    let caps = CANONICAL_TIME.captures(&canonical)?;
    let h: u32 = caps[1].parse().ok()?;
    let m: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(h, m, 0)
}

fn missing(field: Field) -> ValidationIssue {
    ValidationIssue::new(field, format!("Field '{field}' is missing or empty"))
}

fn email_issue(record: &Record, rules: &EmailRules) -> Option<ValidationIssue> {
    (!rules.is_valid(&record.email)).then(|| {
        ValidationIssue::new(
            Field::Email,
            format!("Invalid email address: {}", record.email),
        )
    })
}

fn time_issue(field: Field, value: &str) -> Option<ValidationIssue> {
    let label = if field == Field::StartTime { "start" } else { "end" };
    parse_time_shape(value).is_none().then(|| {
        ValidationIssue::new(
            field,
            format!("Invalid {label} time format: {value} (expected HH:MM)"),
        )
    })
}

/// Fast check: first violation only.
pub fn validate_row(record: &Record, rules: &EmailRules) -> Result<(), ValidationIssue> {
    if let Some((field, _)) = record
        .essential()
        .into_iter()
        .find(|(_, v)| is_blank_or_sentinel(v))
    {
        return Err(missing(field));
    }

    if let Some(issue) = email_issue(record, rules) {
        return Err(issue);
    }

    for field in [Field::StartTime, Field::EndTime] {
        if let Some(issue) = time_issue(field, record.get(field)) {
            return Err(issue);
        }
    }

    Ok(())
}

/// Every violation of one record, including the cross-field rules.
pub fn record_issues(record: &Record, rules: &EmailRules) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (field, value) in record.essential() {
        if is_blank_or_sentinel(value) {
            issues.push(missing(field));
        }
    }

    let present = |f: Field| !is_blank_or_sentinel(record.get(f));

    if present(Field::Email)
        && let Some(issue) = email_issue(record, rules)
    {
        issues.push(issue);
    }

    let mut times = [None, None];
    for (slot, field) in [Field::StartTime, Field::EndTime].into_iter().enumerate() {
        if !present(field) {
            continue;
        }
        match time_issue(field, record.get(field)) {
            Some(issue) => issues.push(issue),
            None => times[slot] = parse_time_shape(record.get(field)),
        }
    }

    if present(Field::Category) && TrainingPath::parse(&record.category).is_none() {
        issues.push(ValidationIssue::new(
            Field::Category,
            format!("Invalid training path: {}", record.category),
        ));
    }

    // Ordering is only checked when both times are well formed.
    if let [Some(start), Some(end)] = times
        && end <= start
    {
        issues.push(ValidationIssue::new(
            Field::EndTime,
            format!(
                "End time ({}) must be after start time ({})",
                record.end_time, record.start_time
            ),
        ));
    }

    issues
}

/// Exhaustive report over the whole dataset; empty means accepted.
pub fn validate_dataset(dataset: &Dataset, rules: &EmailRules) -> Vec<ValidationError> {
    dataset
        .iter()
        .filter_map(|r| {
            let issues = record_issues(&r.record, rules);
            (!issues.is_empty()).then_some(ValidationError { row: r.row, issues })
        })
        .collect()
}
