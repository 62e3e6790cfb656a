//! Aggregations feeding the dashboard charts.
//!
//! Five independent group-by reductions over the same filtered record set.
//! None of them mutate their input, and all of them return an empty series
//! for empty input — "no data" signaling is the presentation layer's job.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{AggregateBundle, DatePoint, Record, Series, SeriesPoint};

/// How many locations the location chart shows.
pub const DEFAULT_TOP_LOCATIONS: usize = 5;

/// Record count per sentiment, descending (ties keep first-seen order).
pub fn sentiment_counts(records: &[Record]) -> Series {
    grouped(records, |r| &r.sentiment, |_| 1)
}

/// Engagement sum per platform, descending.
pub fn platform_engagements(records: &[Record]) -> Series {
    grouped(records, |r| &r.platform, |r| r.engagements)
}

/// Engagement sum per day, ascending by date.
pub fn daily_engagements(records: &[Record]) -> Vec<DatePoint> {
    let mut by_day = BTreeMap::new();
    for r in records {
        *by_day.entry(r.date).or_insert(0u64) += r.engagements;
    }
    by_day
        .into_iter()
        .map(|(date, value)| DatePoint { date, value })
        .collect()
}

/// Record count per media type, descending.
pub fn media_type_counts(records: &[Record]) -> Series {
    grouped(records, |r| &r.media_type, |_| 1)
}

/// Record count for the `n` most-mentioned locations, descending.
///
/// Returns all locations when fewer than `n` exist; ties at the cut keep
/// first-seen order.
pub fn top_locations(records: &[Record], n: usize) -> Series {
    let mut series = grouped(records, |r| &r.location, |_| 1);
    series.truncate(n);
    series
}

/// Compute all five series for one filtered view.
pub fn aggregate_all(records: &[Record], top_n: usize) -> AggregateBundle {
    AggregateBundle {
        n_records: records.len(),
        sentiment_counts: sentiment_counts(records),
        platform_engagements: platform_engagements(records),
        daily_engagements: daily_engagements(records),
        media_type_counts: media_type_counts(records),
        top_locations: top_locations(records, top_n),
    }
}

/// Group-by + reduce with deterministic ordering: accumulate in first-seen
/// order, then stable-sort by value descending so equal values keep their
/// first-seen relative order.
fn grouped<'a>(
    records: &'a [Record],
    key: impl Fn(&'a Record) -> &'a str,
    weight: impl Fn(&Record) -> u64,
) -> Series {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Series = Vec::new();

    for r in records {
        let label = key(r);
        match index.get(label) {
            Some(&i) => out[i].value += weight(r),
            None => {
                index.insert(label, out.len());
                out.push(SeriesPoint {
                    label: label.to_string(),
                    value: weight(r),
                });
            }
        }
    }

    out.sort_by(|a, b| b.value.cmp(&a.value));
    out
}
