//! Cleaning pipeline: raw CSV rows into validated records.
//!
//! The repair-or-drop policy here is deliberate product behavior, not error
//! handling:
//!
//! - a row whose date cannot be parsed is **dropped** (and reported), never defaulted
//! - an engagement cell that fails to parse becomes 0
//! - missing categorical cells become the literal `"Unknown"`
//!
//! Malformed cells are therefore never an error. Only structurally invalid
//! input (unreadable file, broken CSV framing) aborts a run, and that is the
//! ingest layer's job.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{RawRow, Record, UNKNOWN};

/// Calendar-date formats accepted, tried in order.
///
/// ISO first. For ambiguous slash dates, month-first is tried before
/// day-first, matching the convention of the exports this tool is fed.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y"];

/// Timestamp formats accepted; the time-of-day component is discarded.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A row dropped during cleaning (unparseable date), kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Cleaning output: validated records plus the rows that didn't make it.
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub records: Vec<Record>,
    pub dropped: Vec<RowError>,
}

/// Coerce raw rows into validated records, preserving input order.
///
/// Pure function of its input; see the module docs for the repair-or-drop
/// policy applied per cell.
pub fn clean(rows: &[RawRow]) -> CleanReport {
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();

    for row in rows {
        let date_text = row.date.as_deref().map(str::trim).unwrap_or("");
        let Some(date) = parse_date(date_text) else {
            dropped.push(RowError {
                line: row.line,
                message: format!("unparseable date '{date_text}'"),
            });
            continue;
        };

        records.push(Record {
            date,
            engagements: parse_engagements(row.engagements.as_deref()),
            platform: categorical(row.platform.as_deref()),
            sentiment: categorical(row.sentiment.as_deref()),
            media_type: categorical(row.media_type.as_deref()),
            location: categorical(row.location.as_deref()),
        });
    }

    CleanReport { records, dropped }
}

/// Permissive calendar-date parser (day granularity).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// Coerce an engagement cell to a non-negative integer.
///
/// Accepts integers and floats (truncated toward zero). Anything
/// unparseable, non-finite, or negative becomes 0.
pub fn parse_engagements(cell: Option<&str>) -> u64 {
    let Some(text) = cell else { return 0 };
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

fn categorical(cell: Option<&str>) -> String {
    match cell.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        line: usize,
        date: &str,
        engagements: &str,
        platform: &str,
        sentiment: &str,
        media_type: &str,
        location: &str,
    ) -> RawRow {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawRow {
            line,
            date: opt(date),
            engagements: opt(engagements),
            platform: opt(platform),
            sentiment: opt(sentiment),
            media_type: opt(media_type),
            location: opt(location),
        }
    }

    /// Represent an already-clean record back as a raw row.
    fn as_raw(line: usize, record: &Record) -> RawRow {
        RawRow {
            line,
            date: Some(record.date.to_string()),
            engagements: Some(record.engagements.to_string()),
            platform: Some(record.platform.clone()),
            sentiment: Some(record.sentiment.clone()),
            media_type: Some(record.media_type.clone()),
            location: Some(record.location.clone()),
        }
    }

    #[test]
    fn example_scenario() {
        // Row 2 has a bad date and is dropped; row 3 has unparseable
        // engagements and keeps the row with engagements = 0.
        let rows = vec![
            raw(2, "2024-01-01", "10", "X", "Positive", "Video", "NY"),
            raw(3, "bad", "5", "X", "Positive", "Video", "NY"),
            raw(4, "2024-01-02", "abc", "X", "Negative", "Video", "NY"),
        ];

        let report = clean(&rows);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].line, 3);
        assert_eq!(report.records[0].engagements, 10);
        assert_eq!(report.records[1].engagements, 0);
    }

    #[test]
    fn bad_dates_never_become_records() {
        let rows = vec![
            raw(2, "", "1", "X", "Positive", "Video", "NY"),
            raw(3, "not a date", "1", "X", "Positive", "Video", "NY"),
            raw(4, "2024-13-40", "1", "X", "Positive", "Video", "NY"),
        ];
        let report = clean(&rows);
        assert!(report.records.is_empty());
        assert_eq!(report.dropped.len(), 3);
    }

    #[test]
    fn missing_categoricals_become_unknown() {
        let rows = vec![raw(2, "2024-05-01", "7", "", "", "", "  ")];
        let report = clean(&rows);
        let record = &report.records[0];
        assert_eq!(record.platform, UNKNOWN);
        assert_eq!(record.sentiment, UNKNOWN);
        assert_eq!(record.media_type, UNKNOWN);
        assert_eq!(record.location, UNKNOWN);
    }

    #[test]
    fn engagement_coercion() {
        assert_eq!(parse_engagements(Some("42")), 42);
        assert_eq!(parse_engagements(Some("42.9")), 42);
        assert_eq!(parse_engagements(Some(" 7 ")), 7);
        assert_eq!(parse_engagements(Some("abc")), 0);
        assert_eq!(parse_engagements(Some("")), 0);
        assert_eq!(parse_engagements(Some("NaN")), 0);
        assert_eq!(parse_engagements(Some("-5")), 0);
        assert_eq!(parse_engagements(None), 0);
    }

    #[test]
    fn permissive_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(parse_date("2024-01-31"), Some(expected));
        assert_eq!(parse_date("2024/01/31"), Some(expected));
        assert_eq!(parse_date("01/31/2024"), Some(expected));
        assert_eq!(parse_date("31/01/2024"), Some(expected));
        assert_eq!(parse_date("31-01-2024"), Some(expected));
        assert_eq!(parse_date("2024-01-31 14:02:11"), Some(expected));
        assert_eq!(parse_date("2024-01-31T14:02:11"), Some(expected));
    }

    #[test]
    fn input_order_is_preserved() {
        let rows = vec![
            raw(2, "2024-01-03", "3", "A", "Positive", "Video", "NY"),
            raw(3, "2024-01-01", "1", "B", "Negative", "Text", "LA"),
            raw(4, "nope", "9", "C", "Neutral", "Image", "SF"),
            raw(5, "2024-01-02", "2", "D", "Neutral", "Image", "SF"),
        ];
        let report = clean(&rows);
        let platforms: Vec<&str> = report.records.iter().map(|r| r.platform.as_str()).collect();
        assert_eq!(platforms, ["A", "B", "D"]);
    }

    #[test]
    fn cleaning_clean_data_is_idempotent() {
        let rows = vec![
            raw(2, "2024-01-01", "10", "X", "Positive", "Video", "NY"),
            raw(3, "2024-01-02", "0", "", "Negative", "", "LA"),
        ];
        let first = clean(&rows);

        let reencoded: Vec<RawRow> = first
            .records
            .iter()
            .enumerate()
            .map(|(idx, r)| as_raw(idx + 2, r))
            .collect();
        let second = clean(&reencoded);

        assert_eq!(first.records, second.records);
        assert!(second.dropped.is_empty());
    }
}
