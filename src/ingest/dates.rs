//! Lesson date parsing and column-level normalization to DD/MM/YYYY.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Day-first formats plus ISO, as produced by spreadsheet date cells.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y", "%d-%m-%y", "%Y-%m-%d", "%Y/%m/%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Extra shapes tried only by the permissive pass.
const MIXED_FORMATS: &[&str] = &[
    "%m/%d/%Y", "%d %B %Y", "%d %b %Y", "%B %d, %Y", "%b %d, %Y", "%Y%m%d", "%d%m%Y",
];

/// Which pass managed to parse the whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    DayFirst,
    Mixed,
    /// Values left as they were.
    Raw,
}

fn plausible(d: NaiveDate) -> bool {
    (1900..=2999).contains(&d.year())
}

fn try_formats(s: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(|d| plausible(*d))
}

fn try_datetime_formats(s: &str) -> Option<NaiveDate> {
    DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .find(|d| plausible(*d))
}

pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    try_formats(s, DAY_FIRST_FORMATS).or_else(|| try_datetime_formats(s))
}

pub fn parse_mixed(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    parse_day_first(s).or_else(|| try_formats(s, MIXED_FORMATS))
}

/// Rewrite every non-blank value of the date column in DD/MM/YYYY.
///
/// The column is converted as a whole: first with day-first parsing, then
/// with the permissive parser, and if some value still resists the column
/// is left untouched.
pub fn normalize_date_column(values: &mut [String]) -> DateStrategy {
    for (strategy, parser) in [
        (DateStrategy::DayFirst, parse_day_first as fn(&str) -> Option<NaiveDate>),
        (DateStrategy::Mixed, parse_mixed),
    ] {
        let parsed: Option<Vec<Option<NaiveDate>>> = values
            .iter()
            .map(|v| {
                if v.trim().is_empty() {
                    Some(None)
                } else {
                    parser(v).map(Some)
                }
            })
            .collect();

        if let Some(dates) = parsed {
            for (value, date) in values.iter_mut().zip(dates) {
                if let Some(d) = date {
                    *value = d.format(DISPLAY_FORMAT).to_string();
                }
            }
            return strategy;
        }
    }

    log::warn!("Unable to convert the date column, dates will be used as plain text");
    DateStrategy::Raw
}
