//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while the dashboard is running
//! - exported to CSV/JSON
//! - reloaded later to re-print a saved dashboard

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder value for missing categorical cells.
pub const UNKNOWN: &str = "Unknown";

/// One row as received from the CSV, before any coercion.
///
/// Every field is optional: a missing column, an empty cell, or a cell the
/// reader could not associate with a header all land here as `None`. The
/// cleaning pipeline decides what each absence means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based CSV line number, for row-level diagnostics.
    pub line: usize,
    pub date: Option<String>,
    pub engagements: Option<String>,
    pub platform: Option<String>,
    pub sentiment: Option<String>,
    pub media_type: Option<String>,
    pub location: Option<String>,
}

/// A validated, type-coerced media mention.
///
/// Invariants (upheld by `clean`):
/// - `date` parsed successfully (rows with unparseable dates never become records)
/// - `engagements` is a non-negative integer
/// - the four categorical fields are non-empty (possibly `"Unknown"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub engagements: u64,
    pub platform: String,
    pub sentiment: String,
    pub media_type: String,
    pub location: String,
}

/// Optional constraints used to derive a filtered view of the record set.
///
/// `None` means "All" (no constraint) for every field. Date bounds are
/// inclusive. An inverted range (`date_start > date_end`) is not validated
/// here; it simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub platform: Option<String>,
    pub sentiment: Option<String>,
    pub media_type: Option<String>,
    pub location: Option<String>,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self.date_start.is_none()
            && self.date_end.is_none()
            && self.platform.is_none()
            && self.sentiment.is_none()
            && self.media_type.is_none()
            && self.location.is_none()
    }

    /// Short human-readable form for headers and status lines.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(d) = self.date_start {
            parts.push(format!("from {d}"));
        }
        if let Some(d) = self.date_end {
            parts.push(format!("to {d}"));
        }
        if let Some(v) = &self.platform {
            parts.push(format!("platform={v}"));
        }
        if let Some(v) = &self.sentiment {
            parts.push(format!("sentiment={v}"));
        }
        if let Some(v) = &self.media_type {
            parts.push(format!("media type={v}"));
        }
        if let Some(v) = &self.location {
            parts.push(format!("location={v}"));
        }
        if parts.is_empty() {
            "all data".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// One labeled value of an aggregated series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: u64,
}

/// An ordered sequence of (label, value) pairs produced by aggregation.
pub type Series = Vec<SeriesPoint>;

/// One day of the engagement trend. Kept date-typed (rather than a string
/// label) so chart axes and date filters work on real dates; converted to
/// (label, value) form at the report/export boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub value: u64,
}

impl DatePoint {
    pub fn to_series_point(self) -> SeriesPoint {
        SeriesPoint {
            label: self.date.to_string(),
            value: self.value,
        }
    }
}

/// The five dashboard series computed from one filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBundle {
    /// Number of records the series were computed from.
    pub n_records: usize,
    pub sentiment_counts: Series,
    pub platform_engagements: Series,
    pub daily_engagements: Vec<DatePoint>,
    pub media_type_counts: Series,
    pub top_locations: Series,
}

impl AggregateBundle {
    pub fn is_empty(&self) -> bool {
        self.n_records == 0
    }
}

/// A saved dashboard file (JSON).
///
/// This is the "portable" representation of one filtered view: source
/// metadata, cleaning counts, the active criteria, and all five series.
/// The schema is what `mi export` writes and `mi show` reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardFile {
    pub tool: String,
    pub source: String,
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_dropped: usize,
    pub criteria: FilterCriteria,
    pub aggregates: AggregateBundle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_summary_reads_naturally() {
        let mut criteria = FilterCriteria::default();
        assert!(criteria.is_unconstrained());
        assert_eq!(criteria.summary(), "all data");

        criteria.platform = Some("Twitter".to_string());
        criteria.date_start = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(!criteria.is_unconstrained());
        assert_eq!(criteria.summary(), "from 2024-01-01, platform=Twitter");
    }
}
