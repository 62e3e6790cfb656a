//! Synthetic media-intelligence sample generation.
//!
//! Produces a demo CSV with the expected columns and a plausible shape:
//! heavy-tailed engagement counts, weighted sentiment mix, and (optionally)
//! a controlled fraction of malformed cells to exercise the cleaning
//! pipeline. Deterministic under a fixed seed.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use crate::error::AppError;

const PLATFORMS: [&str; 5] = ["Twitter", "Instagram", "TikTok", "Facebook", "YouTube"];
const SENTIMENTS: [(&str, f64); 3] = [("Positive", 0.40), ("Neutral", 0.35), ("Negative", 0.25)];
const MEDIA_TYPES: [&str; 4] = ["Video", "Image", "Text", "Live"];
const LOCATIONS: [&str; 8] = [
    "Jakarta",
    "Surabaya",
    "Bandung",
    "Medan",
    "Yogyakarta",
    "Denpasar",
    "Makassar",
    "Semarang",
];

// Log-normal engagement counts: most mentions get a handful of engagements,
// a few go viral.
const ENGAGEMENT_MU: f64 = 4.0;
const ENGAGEMENT_SIGMA: f64 = 1.2;
const ENGAGEMENT_CAP: f64 = 5_000_000.0;

/// Parameters of one generated file.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub count: usize,
    pub seed: u64,
    /// Fraction of rows given a malformed date or engagement cell.
    pub messy: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SampleSpec {
    pub fn new(
        count: usize,
        seed: u64,
        messy: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, AppError> {
        if count == 0 {
            return Err(AppError::input("Sample count must be > 0."));
        }
        if !(0.0..1.0).contains(&messy) {
            return Err(AppError::input("`--messy` must be in [0.0, 1.0)."));
        }
        if start > end {
            return Err(AppError::input(format!(
                "Sample start date {start} is after end date {end}."
            )));
        }
        Ok(Self {
            count,
            seed,
            messy,
            start,
            end,
        })
    }
}

/// One generated row, as text cells (possibly deliberately malformed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow {
    pub date: String,
    pub engagements: String,
    pub platform: String,
    pub sentiment: String,
    pub media_type: String,
    pub location: String,
}

/// Generate rows and write them as a CSV, returning the row count.
pub fn write_sample_csv(path: &Path, spec: &SampleSpec) -> Result<usize, AppError> {
    let rows = generate_rows(spec)?;

    let mut file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create '{}': {e}", path.display())))?;

    writeln!(file, "Date,Engagements,Platform,Sentiment,Media Type,Location")
        .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))?;
    for row in &rows {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            row.date, row.engagements, row.platform, row.sentiment, row.media_type, row.location
        )
        .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))?;
    }

    Ok(rows.len())
}

/// Generate the rows for `spec`, deterministically.
pub fn generate_rows(spec: &SampleSpec) -> Result<Vec<SampleRow>, AppError> {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let engagement_dist = LogNormal::new(ENGAGEMENT_MU, ENGAGEMENT_SIGMA)
        .map_err(|e| AppError::input(format!("Engagement distribution error: {e}")))?;

    let span_days = (spec.end - spec.start).num_days();
    let mut rows = Vec::with_capacity(spec.count);

    for _ in 0..spec.count {
        let date = spec.start + Duration::days(rng.gen_range(0..=span_days));
        let engagements = engagement_dist
            .sample(&mut rng)
            .round()
            .clamp(0.0, ENGAGEMENT_CAP) as u64;

        let mut row = SampleRow {
            date: date.to_string(),
            engagements: engagements.to_string(),
            platform: pick(&mut rng, &PLATFORMS).to_string(),
            sentiment: pick_sentiment(&mut rng).to_string(),
            media_type: pick(&mut rng, &MEDIA_TYPES).to_string(),
            location: pick(&mut rng, &LOCATIONS).to_string(),
        };

        if spec.messy > 0.0 && rng.gen_bool(spec.messy) {
            // Half the messy rows get an unparseable date (cleaning drops
            // these), the other half an unparseable engagement count
            // (cleaning keeps the row with engagements = 0).
            if rng.gen_bool(0.5) {
                row.date = "n/a".to_string();
            } else {
                row.engagements = "unknown".to_string();
            }
        }

        rows.push(row);
    }

    Ok(rows)
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or(values[0])
}

fn pick_sentiment(rng: &mut StdRng) -> &'static str {
    let roll: f64 = rng.gen_range(0.0..1.0);
    let mut acc = 0.0;
    for (label, weight) in SENTIMENTS {
        acc += weight;
        if roll < acc {
            return label;
        }
    }
    SENTIMENTS[SENTIMENTS.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean;
    use crate::domain::RawRow;

    fn spec(count: usize, seed: u64, messy: f64) -> SampleSpec {
        SampleSpec::new(
            count,
            seed,
            messy,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap()
    }

    fn as_raw(line: usize, row: &SampleRow) -> RawRow {
        RawRow {
            line,
            date: Some(row.date.clone()),
            engagements: Some(row.engagements.clone()),
            platform: Some(row.platform.clone()),
            sentiment: Some(row.sentiment.clone()),
            media_type: Some(row.media_type.clone()),
            location: Some(row.location.clone()),
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_rows(&spec(50, 7, 0.2)).unwrap();
        let b = generate_rows(&spec(50, 7, 0.2)).unwrap();
        let c = generate_rows(&spec(50, 8, 0.2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn tidy_output_survives_cleaning_untouched() {
        let rows = generate_rows(&spec(100, 42, 0.0)).unwrap();
        let raw: Vec<RawRow> = rows
            .iter()
            .enumerate()
            .map(|(idx, r)| as_raw(idx + 2, r))
            .collect();

        let report = clean::clean(&raw);
        assert_eq!(report.records.len(), 100);
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn messy_output_exercises_the_drop_path() {
        let rows = generate_rows(&spec(200, 42, 0.5)).unwrap();
        let raw: Vec<RawRow> = rows
            .iter()
            .enumerate()
            .map(|(idx, r)| as_raw(idx + 2, r))
            .collect();

        let report = clean::clean(&raw);
        assert!(!report.dropped.is_empty());
        assert_eq!(report.records.len() + report.dropped.len(), 200);
    }

    #[test]
    fn spec_validation_rejects_bad_inputs() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert!(SampleSpec::new(0, 1, 0.0, start, end).is_err());
        assert!(SampleSpec::new(10, 1, 1.0, start, end).is_err());
        assert!(SampleSpec::new(10, 1, -0.1, start, end).is_err());
        assert!(SampleSpec::new(10, 1, 0.0, end, start).is_err());
    }
}
