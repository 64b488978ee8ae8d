//! Dispatch report export (CSV or JSON, chosen by extension).

use crate::errors::AppResult;
use crate::models::DispatchReport;
use crate::ui::messages::success;
use crate::utils::fs::ensure_parent;
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    /// `.json` selects JSON; anything else is written as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ReportFormat::Json,
            _ => ReportFormat::Csv,
        }
    }
}

#[derive(Serialize)]
struct ReportRow<'a> {
    row: usize,
    name: &'a str,
    email: &'a str,
    status: &'static str,
    message: &'a str,
    file: String,
}

/// Scrive un record per esito nel CSV indicato.
pub fn write_csv(path: &Path, report: &DispatchReport) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    for o in &report.outcomes {
        wtr.serialize(ReportRow {
            row: o.row,
            name: &o.name,
            email: &o.email,
            status: o.status.as_str(),
            message: &o.message,
            file: o
                .artifact
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Scrive il report completo in JSON formattato.
pub fn write_json(path: &Path, report: &DispatchReport) -> AppResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn write_report(path: &Path, report: &DispatchReport) -> AppResult<()> {
    ensure_parent(path)?;
    match ReportFormat::from_path(path) {
        ReportFormat::Csv => write_csv(path, report)?,
        ReportFormat::Json => write_json(path, report)?,
    }
    success(format!("Report written: {}", path.display()));
    Ok(())
}
