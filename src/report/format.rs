//! String builders for the `report` and `show` commands.

use crate::domain::{AggregateBundle, DashboardFile, FilterCriteria, Series, SeriesPoint};
use crate::io::ingest::IngestedData;

/// How many dropped-row diagnostics the summary prints before eliding.
const MAX_DROPPED_SHOWN: usize = 5;

/// Format the run summary: source, cleaning counts, stats, active filter.
pub fn format_summary(data: &IngestedData, criteria: &FilterCriteria, matched: usize) -> String {
    let mut out = String::new();

    out.push_str("=== mi - Media Intelligence Dashboard ===\n");
    out.push_str(&format!("Source: {}\n", data.source));
    out.push_str(&format!(
        "Rows: read={} kept={} dropped={}\n",
        data.rows_read,
        data.rows_used,
        data.dropped.len()
    ));
    out.push_str(&format!(
        "Dates: {} .. {} | total engagements: {}\n",
        data.stats.date_min, data.stats.date_max, data.stats.total_engagements
    ));
    out.push_str(&format!("Filter: {}\n", criteria.summary()));
    out.push_str(&format!("Matched: {matched} record(s)\n"));

    if !data.dropped.is_empty() {
        out.push_str("\nDropped rows:\n");
        for err in data.dropped.iter().take(MAX_DROPPED_SHOWN) {
            out.push_str(&format!("  line {}: {}\n", err.line, err.message));
        }
        if data.dropped.len() > MAX_DROPPED_SHOWN {
            out.push_str(&format!(
                "  ... and {} more\n",
                data.dropped.len() - MAX_DROPPED_SHOWN
            ));
        }
    }

    out
}

/// Format all five series as aligned tables.
pub fn format_bundle(bundle: &AggregateBundle) -> String {
    if bundle.is_empty() {
        return "No data matches the selected filters. Adjust your filters.\n".to_string();
    }

    let daily: Series = bundle
        .daily_engagements
        .iter()
        .map(|d| d.to_series_point())
        .collect();

    let mut out = String::new();
    out.push_str(&format_series("Sentiment breakdown", "sentiment", "posts", &bundle.sentiment_counts, true));
    out.push('\n');
    out.push_str(&format_series("Platform engagements", "platform", "engagements", &bundle.platform_engagements, true));
    out.push('\n');
    out.push_str(&format_series("Engagement trend", "date", "engagements", &daily, false));
    out.push('\n');
    out.push_str(&format_series("Media type mix", "media type", "posts", &bundle.media_type_counts, true));
    out.push('\n');
    out.push_str(&format_series("Top locations", "location", "posts", &bundle.top_locations, true));
    out
}

/// Format a saved bundle (for `mi show`).
pub fn format_dashboard_file(dashboard: &DashboardFile) -> String {
    let mut out = String::new();
    out.push_str("=== mi - saved dashboard ===\n");
    out.push_str(&format!("Source: {}\n", dashboard.source));
    out.push_str(&format!(
        "Rows: read={} kept={} dropped={}\n",
        dashboard.rows_read, dashboard.rows_used, dashboard.rows_dropped
    ));
    out.push_str(&format!("Filter: {}\n", dashboard.criteria.summary()));
    out.push_str(&format!("Matched: {} record(s)\n\n", dashboard.aggregates.n_records));
    out.push_str(&format_bundle(&dashboard.aggregates));
    out
}

/// One aligned table. `with_share` appends each row's percentage of the
/// series total.
fn format_series(
    title: &str,
    label_header: &str,
    value_header: &str,
    series: &Series,
    with_share: bool,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));

    if series.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let total: u64 = series.iter().map(|p| p.value).sum();

    if with_share {
        out.push_str(&format!("{:<24} {:>12} {:>8}\n", label_header, value_header, "share"));
        out.push_str(&format!("{:-<24} {:->12} {:->8}\n", "", "", ""));
    } else {
        out.push_str(&format!("{:<24} {:>12}\n", label_header, value_header));
        out.push_str(&format!("{:-<24} {:->12}\n", "", ""));
    }

    for point in series {
        if with_share {
            out.push_str(&format!(
                "{:<24} {:>12} {:>7.1}%\n",
                truncate(&point.label, 24),
                point.value,
                share(point, total),
            ));
        } else {
            out.push_str(&format!(
                "{:<24} {:>12}\n",
                truncate(&point.label, 24),
                point.value,
            ));
        }
    }

    out
}

fn share(point: &SeriesPoint, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * point.value as f64 / total as f64
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DatePoint;

    #[test]
    fn bundle_tables_include_labels_values_and_shares() {
        let bundle = AggregateBundle {
            n_records: 4,
            sentiment_counts: vec![
                SeriesPoint { label: "Positive".to_string(), value: 3 },
                SeriesPoint { label: "Negative".to_string(), value: 1 },
            ],
            platform_engagements: vec![SeriesPoint { label: "Twitter".to_string(), value: 25 }],
            daily_engagements: vec![DatePoint { date: "2024-01-01".parse().unwrap(), value: 25 }],
            media_type_counts: vec![SeriesPoint { label: "Video".to_string(), value: 4 }],
            top_locations: vec![SeriesPoint { label: "NY".to_string(), value: 4 }],
        };

        let text = format_bundle(&bundle);
        assert!(text.contains("Sentiment breakdown"));
        assert!(text.contains("Positive"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("Top locations"));
    }

    #[test]
    fn empty_bundle_reports_no_data() {
        let bundle = AggregateBundle {
            n_records: 0,
            sentiment_counts: Vec::new(),
            platform_engagements: Vec::new(),
            daily_engagements: Vec::new(),
            media_type_counts: Vec::new(),
            top_locations: Vec::new(),
        };
        assert!(format_bundle(&bundle).contains("No data matches"));
    }

    #[test]
    fn long_labels_are_truncated() {
        let long = "a".repeat(40);
        assert_eq!(truncate(&long, 24).chars().count(), 24);
        assert!(truncate(&long, 24).ends_with('.'));
        assert_eq!(truncate("short", 24), "short");
    }
}
