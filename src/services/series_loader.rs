use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::config::ColumnMap;
use crate::errors::LoadError;
use crate::models::{ObservationPoint, Series};

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"];

/// Load one raw CSV export and clean it into a `Series`.
///
/// Rows with an unparsable date or price are dropped. When several rows share
/// a date, the last one in file order wins. The result is sorted by date.
pub fn load(path: &Path, columns: &ColumnMap) -> Result<Series, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let parse_failure = |reason: String| LoadError::ParseFailure {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| parse_failure(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| parse_failure(e.to_string()))?
        .clone();
    let date_idx = column_index(&headers, &columns.date)
        .ok_or_else(|| parse_failure(format!("missing date column '{}'", columns.date)))?;
    let value_idx = column_index(&headers, &columns.value)
        .ok_or_else(|| parse_failure(format!("missing value column '{}'", columns.value)))?;

    let currency = Regex::new(r"[$,]").map_err(|e| parse_failure(e.to_string()))?;

    // BTreeMap keeps dates ordered and lets later rows overwrite earlier ones
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut rows = 0usize;
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record.map_err(|e| parse_failure(e.to_string()))?;
        rows += 1;

        let date = record.get(date_idx).and_then(parse_date);
        let value = record.get(value_idx).and_then(|raw| parse_price(&currency, raw));

        match (date, value) {
            (Some(date), Some(value)) => {
                by_date.insert(date, value);
            }
            _ => dropped += 1,
        }
    }

    debug!(
        "Loaded {}: {} rows, {} dropped, {} unique dates",
        path.display(),
        rows,
        dropped,
        by_date.len()
    );

    let points = by_date
        .into_iter()
        .map(|(date, value)| ObservationPoint { date, value })
        .collect();

    Series::from_sorted(points).ok_or_else(|| LoadError::Empty(path.to_path_buf()))
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name.trim())
}

/// Parse a calendar date, accepting the common export formats. Returns
/// `None` instead of failing.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a price such as "$1,234.56". Returns `None` for anything that is
/// not a finite number once currency symbols and separators are removed.
fn parse_price(currency: &Regex, raw: &str) -> Option<f64> {
    let cleaned = currency.replace_all(raw, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
