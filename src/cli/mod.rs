//! Command-line parsing for the media intelligence dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::agg;
use crate::clean;
use crate::data::sample::SampleSpec;
use crate::domain::FilterCriteria;
use crate::error::AppError;

pub mod picker;

/// Default span of generated sample data when no dates are given.
const SAMPLE_SPAN_DAYS: i64 = 90;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mi", version, about = "Interactive media intelligence dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (the default when no subcommand is given).
    Dash(DashArgs),
    /// Print the dataset summary and the five aggregated series as tables.
    Report(ReportArgs),
    /// Write one CSV per series plus a dashboard bundle JSON.
    Export(ExportArgs),
    /// Re-print the tables from a previously exported bundle JSON.
    Show(ShowArgs),
    /// Generate a synthetic media-intelligence CSV for demos and testing.
    Sample(SampleArgs),
}

/// Options for the interactive dashboard.
#[derive(Debug, Parser, Clone)]
pub struct DashArgs {
    /// Media-intelligence CSV to open. Prompts with a file picker when omitted.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

/// Filter flags shared by `report` and `export`. Absent flag = "All".
#[derive(Debug, Parser, Clone, Default)]
pub struct FilterArgs {
    /// Only records from this platform.
    #[arg(long)]
    pub platform: Option<String>,

    /// Only records with this sentiment.
    #[arg(long)]
    pub sentiment: Option<String>,

    /// Only records with this media type.
    #[arg(long = "media-type")]
    pub media_type: Option<String>,

    /// Only records from this location.
    #[arg(long)]
    pub location: Option<String>,

    /// Inclusive start date (e.g. 2024-01-01).
    #[arg(long)]
    pub from: Option<String>,

    /// Inclusive end date.
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> Result<FilterCriteria, AppError> {
        Ok(FilterCriteria {
            date_start: self.from.as_deref().map(parse_cli_date).transpose()?,
            date_end: self.to.as_deref().map(parse_cli_date).transpose()?,
            platform: self.platform.clone(),
            sentiment: self.sentiment.clone(),
            media_type: self.media_type.clone(),
            location: self.location.clone(),
        })
    }
}

/// Options for printing a report.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Media-intelligence CSV to load. Prompts with a file picker when omitted.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// How many locations the top-locations table shows.
    #[arg(long, default_value_t = agg::DEFAULT_TOP_LOCATIONS)]
    pub top: usize,
}

/// Options for exporting series files.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Media-intelligence CSV to load. Prompts with a file picker when omitted.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// How many locations the top-locations series keeps.
    #[arg(long, default_value_t = agg::DEFAULT_TOP_LOCATIONS)]
    pub top: usize,

    /// Directory the series CSVs and bundle JSON are written into.
    #[arg(short = 'o', long = "out-dir", default_value = "export")]
    pub out_dir: PathBuf,
}

/// Options for re-printing a saved bundle.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Bundle JSON produced by `mi export`.
    #[arg(long, value_name = "JSON")]
    pub bundle: PathBuf,
}

/// Options for sample generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "sample.csv")]
    pub out: PathBuf,

    /// Number of rows to generate.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub count: usize,

    /// Random seed, for reproducible files.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of rows given malformed date/engagement cells (0.0 - 1.0),
    /// to exercise the cleaning pipeline.
    #[arg(long, default_value_t = 0.0)]
    pub messy: f64,

    /// First date of the generated range. Defaults to 90 days before `--end`.
    #[arg(long)]
    pub start: Option<String>,

    /// Last date of the generated range. Defaults to today.
    #[arg(long)]
    pub end: Option<String>,
}

impl SampleArgs {
    pub fn to_spec(&self) -> Result<SampleSpec, AppError> {
        let end = match self.end.as_deref() {
            Some(text) => parse_cli_date(text)?,
            None => Local::now().date_naive(),
        };
        let start = match self.start.as_deref() {
            Some(text) => parse_cli_date(text)?,
            None => end - Duration::days(SAMPLE_SPAN_DAYS - 1),
        };

        SampleSpec::new(self.count, self.seed, self.messy, start, end)
    }
}

fn parse_cli_date(text: &str) -> Result<NaiveDate, AppError> {
    clean::parse_date(text)
        .ok_or_else(|| AppError::input(format!("Invalid date '{text}'. Expected e.g. YYYY-MM-DD.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_args_map_to_criteria() {
        let args = FilterArgs {
            platform: Some("Twitter".to_string()),
            from: Some("2024-01-01".to_string()),
            to: Some("01/31/2024".to_string()),
            ..Default::default()
        };
        let criteria = args.to_criteria().unwrap();
        assert_eq!(criteria.platform.as_deref(), Some("Twitter"));
        assert_eq!(criteria.date_start.unwrap().to_string(), "2024-01-01");
        assert_eq!(criteria.date_end.unwrap().to_string(), "2024-01-31");
        assert!(criteria.sentiment.is_none());
    }

    #[test]
    fn bad_cli_date_is_an_input_error() {
        let args = FilterArgs {
            from: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(args.to_criteria().unwrap_err().exit_code(), 2);
    }
}
