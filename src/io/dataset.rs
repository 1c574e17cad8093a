//! CSV ingest of the historical demand table.
//!
//! The source file carries many columns (weather, time of day, ...); only the
//! date and the historical demand are kept. Rows that cannot be used are
//! skipped and reported, never fatal. A missing required column is.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{DATE_COLUMN, LOAD_COLUMN, LoadRecord};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// The in-memory dataset table, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LoadRecord>,
    row_errors: Vec<RowError>,
    rows_read: usize,
}

impl Dataset {
    /// Load the dataset from a CSV file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::data(format!("Failed to open dataset '{}': {e}", path.display())))?;
        Self::from_reader(file)
    }

    /// Load the dataset from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::data(format!("Failed to read dataset headers: {e}")))?
            .clone();
        let header_map = build_header_map(&headers);

        let date_idx = required_column(&header_map, DATE_COLUMN)?;
        let load_idx = required_column(&header_map, LOAD_COLUMN)?;

        let mut records = Vec::new();
        let mut row_errors = Vec::new();
        let mut rows_read = 0usize;

        for (idx, result) in reader.records().enumerate() {
            // records() starts after the header line; lines are 1-based.
            let line = idx + 2;
            rows_read += 1;

            let parsed = result
                .map_err(|e| format!("CSV parse error: {e}"))
                .and_then(|record| parse_row(&record, date_idx, load_idx));
            match parsed {
                Ok(rec) => records.push(rec),
                Err(message) => row_errors.push(RowError { line, message }),
            }
        }

        Ok(Self {
            records,
            row_errors,
            rows_read,
        })
    }

    pub fn from_records(records: Vec<LoadRecord>) -> Self {
        Self {
            rows_read: records.len(),
            records,
            row_errors: Vec::new(),
        }
    }

    pub fn records(&self) -> &[LoadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on duplicate headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

fn required_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(&normalize_header_name(name))
        .copied()
        .ok_or_else(|| AppError::data(format!("Missing required dataset column: `{name}`")))
}

fn parse_row(record: &StringRecord, date_idx: usize, load_idx: usize) -> Result<LoadRecord, String> {
    let date = record
        .get(date_idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing value: `{DATE_COLUMN}`"))?;
    let day = parse_date(date)?;

    let load_raw = record
        .get(load_idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing value: `{LOAD_COLUMN}`"))?;
    let load = load_raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid load '{load_raw}'."))?;

    Ok(LoadRecord {
        date: date.to_string(),
        day,
        load,
    })
}

/// Parse a calendar day in one of the accepted layouts.
///
/// Layouts with the year last are month-first (`03/09/2024` is 9 March).
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d"];
    let s = s.trim();
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, MM/DD/YYYY, MM-DD-YYYY, YYYY/MM/DD."
    ))
}
