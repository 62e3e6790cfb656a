//! Filter engine: derive a filtered view of the validated record set.
//!
//! Filtering never mutates the record set; it produces a new sequence in the
//! original relative order. All active constraints must hold (logical AND),
//! and each constraint is evaluated independently.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{FilterCriteria, Record};

/// Keep the records satisfying every active constraint in `criteria`.
///
/// An empty result is a valid outcome, including for an inverted date range
/// (`date_start > date_end`) — ordering of the bounds is the caller's
/// responsibility and is deliberately not validated here.
pub fn apply(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect()
}

/// Whether one record satisfies every active constraint.
pub fn matches(record: &Record, criteria: &FilterCriteria) -> bool {
    if let Some(start) = criteria.date_start {
        if record.date < start {
            return false;
        }
    }
    if let Some(end) = criteria.date_end {
        if record.date > end {
            return false;
        }
    }

    matches_value(&record.platform, criteria.platform.as_deref())
        && matches_value(&record.sentiment, criteria.sentiment.as_deref())
        && matches_value(&record.media_type, criteria.media_type.as_deref())
        && matches_value(&record.location, criteria.location.as_deref())
}

// Exact match: constraint values are drawn from the dataset's own uniques.
fn matches_value(value: &str, constraint: Option<&str>) -> bool {
    let Some(constraint) = constraint else {
        return true;
    };
    value == constraint
}

/// Sorted unique values per categorical field, used to populate the
/// dashboard selectors ("All" + these).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub platforms: Vec<String>,
    pub sentiments: Vec<String>,
    pub media_types: Vec<String>,
    pub locations: Vec<String>,
}

pub fn filter_options(records: &[Record]) -> FilterOptions {
    let mut platforms = BTreeSet::new();
    let mut sentiments = BTreeSet::new();
    let mut media_types = BTreeSet::new();
    let mut locations = BTreeSet::new();

    for r in records {
        platforms.insert(r.platform.clone());
        sentiments.insert(r.sentiment.clone());
        media_types.insert(r.media_type.clone());
        locations.insert(r.location.clone());
    }

    FilterOptions {
        platforms: platforms.into_iter().collect(),
        sentiments: sentiments.into_iter().collect(),
        media_types: media_types.into_iter().collect(),
        locations: locations.into_iter().collect(),
    }
}

/// Earliest and latest record dates, used as the default date-range bounds.
pub fn date_bounds(records: &[Record]) -> Option<(NaiveDate, NaiveDate)> {
    let first = records.first()?.date;
    let (min, max) = records
        .iter()
        .fold((first, first), |(min, max), r| (min.min(r.date), max.max(r.date)));
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, engagements: u64, platform: &str, sentiment: &str, location: &str) -> Record {
        Record {
            date: date.parse().unwrap(),
            engagements,
            platform: platform.to_string(),
            sentiment: sentiment.to_string(),
            media_type: "Video".to_string(),
            location: location.to_string(),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record("2024-01-01", 10, "Twitter", "Positive", "NY"),
            record("2024-01-02", 5, "Instagram", "Negative", "LA"),
            record("2024-01-03", 8, "Twitter", "Neutral", "NY"),
            record("2024-01-04", 2, "TikTok", "Positive", "SF"),
        ]
    }

    #[test]
    fn no_constraints_keeps_everything_in_order() {
        let records = sample();
        let out = apply(&records, &FilterCriteria::default());
        assert_eq!(out, records);
    }

    #[test]
    fn constraints_are_conjunctive() {
        let records = sample();
        let criteria = FilterCriteria {
            platform: Some("Twitter".to_string()),
            sentiment: Some("Positive".to_string()),
            ..Default::default()
        };
        let out = apply(&records, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date.to_string(), "2024-01-01");

        // Every record in the output satisfies every active constraint,
        // and every excluded record violates at least one.
        for r in &records {
            let kept = out.contains(r);
            assert_eq!(kept, matches(r, &criteria));
        }
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let records = sample();
        let criteria = FilterCriteria {
            date_start: Some("2024-01-02".parse().unwrap()),
            date_end: Some("2024-01-03".parse().unwrap()),
            ..Default::default()
        };
        let out = apply(&records, &criteria);
        let dates: Vec<String> = out.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn inverted_range_yields_empty_not_error() {
        let records = sample();
        let criteria = FilterCriteria {
            date_start: Some("2024-01-04".parse().unwrap()),
            date_end: Some("2024-01-01".parse().unwrap()),
            ..Default::default()
        };
        assert!(apply(&records, &criteria).is_empty());
    }

    #[test]
    fn unmatched_constraint_yields_empty() {
        let records = sample();
        let criteria = FilterCriteria {
            location: Some("Jakarta".to_string()),
            ..Default::default()
        };
        assert!(apply(&records, &criteria).is_empty());
    }

    #[test]
    fn options_are_sorted_and_unique() {
        let options = filter_options(&sample());
        assert_eq!(options.platforms, ["Instagram", "TikTok", "Twitter"]);
        assert_eq!(options.sentiments, ["Negative", "Neutral", "Positive"]);
        assert_eq!(options.media_types, ["Video"]);
        assert_eq!(options.locations, ["LA", "NY", "SF"]);
    }

    #[test]
    fn date_bounds_span_the_dataset() {
        let (min, max) = date_bounds(&sample()).unwrap();
        assert_eq!(min.to_string(), "2024-01-01");
        assert_eq!(max.to_string(), "2024-01-04");
        assert!(date_bounds(&[]).is_none());
    }
}
