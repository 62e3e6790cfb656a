//! CSV ingest: turn a user-supplied file into a validated record set.
//!
//! This module is responsible for reading the file and mapping headers to
//! fields; all cell-level coercion policy lives in `clean`. Design goals:
//!
//! - **Tolerant headers**: BOM, case, and surrounding whitespace don't matter
//! - **Row-level resilience**: a malformed row never aborts the load
//! - **Deterministic behavior**: same file, same records, same diagnostics

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::clean::{self, RowError};
use crate::domain::{RawRow, Record};
use crate::error::AppError;
use crate::filter;

/// Summary stats about the cleaned dataset.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_records: usize,
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
    pub total_engagements: u64,
}

/// Ingest output: validated records + stats + cleaning diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedData {
    /// Display form of the source path.
    pub source: String,
    pub records: Vec<Record>,
    pub stats: DatasetStats,
    /// Rows that did not survive (CSV framing problems or unparseable dates).
    pub dropped: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and clean a media-intelligence CSV.
///
/// Fails with exit code 2 for unreadable/structurally invalid files or a
/// missing `Date` column, and exit code 3 when cleaning leaves no records.
pub fn load_dataset(path: &Path) -> Result<IngestedData, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::input(format!("Failed to read CSV '{}': {e}", path.display())))?;
    parse_dataset(&path.display().to_string(), &bytes)
}

/// Parse and clean CSV bytes already read from `source`.
///
/// Split out from [`load_dataset`] so the session layer can hash the exact
/// bytes it parses (its re-clean memoization key).
pub fn parse_dataset(source: &str, bytes: &[u8]) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    if !header_map.contains_key("date") {
        return Err(AppError::input(format!(
            "Missing required column `Date` in '{source}'."
        )));
    }

    let mut raw_rows = Vec::new();
    let mut dropped = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header row and CSV line
        // numbers are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                dropped.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        raw_rows.push(raw_row(line, &record, &header_map));
    }

    let report = clean::clean(&raw_rows);
    dropped.extend(report.dropped);
    dropped.sort_by_key(|e| e.line);

    let records = report.records;
    let Some((date_min, date_max)) = filter::date_bounds(&records) else {
        return Err(AppError::data(format!(
            "No rows with a parseable date remain in '{source}' after cleaning."
        )));
    };

    let stats = DatasetStats {
        n_records: records.len(),
        date_min,
        date_max,
        total_engagements: records.iter().map(|r| r.engagements).sum(),
    };

    Ok(IngestedData {
        source: source.to_string(),
        rows_used: records.len(),
        records,
        stats,
        dropped,
        rows_read,
    })
}

fn raw_row(line: usize, record: &StringRecord, header_map: &HashMap<String, usize>) -> RawRow {
    RawRow {
        line,
        date: get_cell(record, header_map, "date"),
        engagements: get_cell(record, header_map, "engagements"),
        platform: get_cell(record, header_map, "platform"),
        sentiment: get_cell(record, header_map, "sentiment"),
        media_type: get_cell(record, header_map, "media type"),
        location: get_cell(record, header_map, "location"),
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "\u{feff}Date"). Strip it so the column is
    // still recognized.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_cell(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<String> {
    let idx = header_map.get(name)?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
