//! Export aggregated series to CSV.
//!
//! One file per series, written to an output directory. The exports are
//! meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{AggregateBundle, Series};
use crate::error::AppError;

/// Write one `label,value` CSV per series into `dir`, returning the paths.
pub fn write_series_csvs(dir: &Path, bundle: &AggregateBundle) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir).map_err(|e| {
        AppError::input(format!(
            "Failed to create export directory '{}': {e}",
            dir.display()
        ))
    })?;

    let daily: Series = bundle
        .daily_engagements
        .iter()
        .map(|d| d.to_series_point())
        .collect();

    let files: [(&str, &str, &Series); 5] = [
        ("sentiment_counts.csv", "sentiment,count", &bundle.sentiment_counts),
        ("platform_engagements.csv", "platform,engagements", &bundle.platform_engagements),
        ("daily_engagements.csv", "date,engagements", &daily),
        ("media_type_counts.csv", "media_type,count", &bundle.media_type_counts),
        ("top_locations.csv", "location,count", &bundle.top_locations),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, header, series) in files {
        let path = dir.join(name);
        write_series(&path, header, series)?;
        written.push(path);
    }
    Ok(written)
}

fn write_series(path: &Path, header: &str, series: &Series) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create '{}': {e}", path.display())))?;

    writeln!(file, "{header}")
        .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))?;
    for point in series {
        writeln!(file, "{},{}", csv_field(&point.label), point.value)
            .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))?;
    }
    Ok(())
}

// Locations routinely look like "Jakarta, ID"; quote when needed.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesPoint;

    #[test]
    fn fields_with_commas_are_quoted() {
        assert_eq!(csv_field("NY"), "NY");
        assert_eq!(csv_field("Jakarta, ID"), "\"Jakarta, ID\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn writes_one_file_per_series() {
        let dir = std::env::temp_dir().join(format!("media-intel-export-{}", std::process::id()));
        let bundle = AggregateBundle {
            n_records: 1,
            sentiment_counts: vec![SeriesPoint {
                label: "Positive".to_string(),
                value: 1,
            }],
            platform_engagements: Vec::new(),
            daily_engagements: Vec::new(),
            media_type_counts: Vec::new(),
            top_locations: Vec::new(),
        };

        let written = write_series_csvs(&dir, &bundle).unwrap();
        assert_eq!(written.len(), 5);
        let sentiment = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(sentiment, "sentiment,count\nPositive,1\n");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
