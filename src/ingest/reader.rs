//! Spreadsheet / CSV reading into a plain table of optional strings.

use crate::ingest::LoadError;
use crate::models::Field;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Zero-based position among the data lines (header excluded), shifted
    /// by any blank rows above the header.
    pub index: usize,
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn cell(&self, col: usize) -> Option<&str> {
        self.cells.get(col).and_then(|c| c.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Required columns absent from the header, in `required` order.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| self.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect()
    }

    /// Builds a table from a header row and data rows; blank lines dropped.
    pub fn from_rows<I>(header: Vec<Option<String>>, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<Option<String>>>,
    {
        let headers = header
            .into_iter()
            .map(|h| h.map(|s| s.trim().to_string()).unwrap_or_default())
            .collect();

        let rows = rows
            .into_iter()
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(Option::is_some))
            .map(|(index, cells)| RawRow { index, cells })
            .collect();

        Self { headers, rows }
    }
}

/// Read the first sheet of a workbook, or a CSV file, by extension.
pub fn read_table(path: &Path) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn read_error(path: &Path, reason: impl ToString) -> LoadError {
    LoadError::Read {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn read_workbook(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptySheet)?
        .map_err(|e| read_error(path, e))?;

    // the range starts at the first used cell, not at A1
    let skipped = range.start().map_or(0, |(row, _)| row as usize);

    let mut rows = range.rows();
    let header: Vec<Option<String>> = rows
        .next()
        .ok_or(LoadError::EmptySheet)?
        .iter()
        .map(cell_to_string)
        .collect();
    let time_columns: Vec<bool> = header
        .iter()
        .map(|h| {
            h.as_deref()
                .and_then(|name| Field::from_column(name.trim()))
                .is_some_and(|f| f.is_time())
        })
        .collect();

    let data = rows.map(|r| {
        r.iter()
            .enumerate()
            .map(|(col, cell)| {
                if time_columns.get(col).copied().unwrap_or(false) {
                    time_cell_to_string(cell)
                } else {
                    cell_to_string(cell)
                }
            })
            .collect::<Vec<_>>()
    });

    let mut table = RawTable::from_rows(header, data);
    for row in &mut table.rows {
        row.index += skipped;
    }
    Ok(table)
}

fn detect_delimiter(path: &Path) -> Result<u8, LoadError> {
    let file = File::open(path).map_err(|e| read_error(path, e))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|e| read_error(path, e))?;

    let semicolons = first.matches(';').count();
    let commas = first.matches(',').count();
    Ok(if semicolons > commas { b';' } else { b',' })
}

fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let delimiter = detect_delimiter(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| read_error(path, e))?;

    let mut records = reader.records();
    let header = match records.next() {
        Some(r) => r.map_err(|e| read_error(path, e))?,
        None => return Err(LoadError::EmptySheet),
    };
    let header = header
        .iter()
        .map(|h| Some(h.trim_start_matches('\u{feff}').to_string()))
        .collect();

    let mut data = Vec::new();
    for record in records {
        let record = record.map_err(|e| read_error(path, e))?;
        data.push(record.iter().map(text_cell).collect::<Vec<_>>());
    }

    Ok(RawTable::from_rows(header, data))
}

fn text_cell(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Text form of a workbook cell; `None` for empty cells.
pub fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => text_cell(s),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_number(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(excel_serial_to_string(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
        Data::Error(e) => Some(format!("#{e:?}")),
    }
}

/// Text form of a cell in a time column.
///
/// A time typed as `14.30` is stored by the spreadsheet as the number
/// `14.3`, so hour-sized numbers keep two decimals.
pub fn time_cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Float(f) if (1.0..24.0).contains(f) => Some(format!("{f:.2}")),
        _ => cell_to_string(cell),
    }
}

fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Excel serial -> `HH:MM:SS` (time only), `YYYY-MM-DD` or both.
pub fn excel_serial_to_string(serial: f64) -> String {
    let total_secs = (serial * 86400.0).round() as i64;
    let days = total_secs.div_euclid(86400);
    let secs = total_secs.rem_euclid(86400);
    let time = format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60);

    if days == 0 {
        return time;
    }

    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return serial.to_string();
    };
    let date = (epoch + Duration::days(days)).format("%Y-%m-%d").to_string();

    if secs == 0 {
        date
    } else {
        format!("{date} {time}")
    }
}
