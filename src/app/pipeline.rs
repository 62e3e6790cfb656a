//! Shared dashboard pipeline used by both the CLI commands and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> clean -> filter -> aggregate
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::agg;
use crate::domain::{AggregateBundle, DashboardFile, FilterCriteria};
use crate::error::AppError;
use crate::filter;
use crate::io::ingest::{self, IngestedData};

/// One filtered dashboard view: the criteria that produced it plus the five
/// aggregated series.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub aggregates: AggregateBundle,
}

/// Filter the cleaned record set and compute all five series.
pub fn build_view(data: &IngestedData, criteria: &FilterCriteria, top_n: usize) -> DashboardView {
    let filtered = filter::apply(&data.records, criteria);
    DashboardView {
        criteria: criteria.clone(),
        aggregates: agg::aggregate_all(&filtered, top_n),
    }
}

/// Package a view as the portable bundle schema.
pub fn to_dashboard_file(data: &IngestedData, view: &DashboardView) -> DashboardFile {
    DashboardFile {
        tool: "mi".to_string(),
        source: data.source.clone(),
        rows_read: data.rows_read,
        rows_used: data.rows_used,
        rows_dropped: data.dropped.len(),
        criteria: view.criteria.clone(),
        aggregates: view.aggregates.clone(),
    }
}

/// The current dataset, held for the lifetime of a dashboard session.
///
/// A new upload replaces the record set wholesale; there is no partial
/// visibility since everything runs on one thread. Reloading a file whose
/// bytes are unchanged skips re-cleaning: the cleaned record set is keyed by
/// a content hash of the raw input.
pub struct Session {
    path: PathBuf,
    content_hash: u64,
    data: IngestedData,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let bytes = read_bytes(path)?;
        let data = ingest::parse_dataset(&path.display().to_string(), &bytes)?;
        Ok(Self {
            path: path.to_path_buf(),
            content_hash: content_hash(&bytes),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &IngestedData {
        &self.data
    }

    /// Re-read the file. Returns `false` when the bytes are unchanged (the
    /// cleaned record set is kept as-is), `true` when the dataset was
    /// replaced. On error the current dataset stays in place.
    pub fn reload(&mut self) -> Result<bool, AppError> {
        let bytes = read_bytes(&self.path)?;
        let hash = content_hash(&bytes);
        if hash == self.content_hash {
            return Ok(false);
        }

        let data = ingest::parse_dataset(&self.path.display().to_string(), &bytes)?;
        self.content_hash = hash;
        self.data = data;
        Ok(true)
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, AppError> {
    std::fs::read(path)
        .map_err(|e| AppError::input(format!("Failed to read CSV '{}': {e}", path.display())))
}

fn content_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "Date,Engagements,Platform,Sentiment,Media Type,Location\n\
                       2024-01-01,10,Twitter,Positive,Video,NY\n\
                       2024-01-02,5,Instagram,Negative,Image,LA\n";

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("media-intel-session-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn build_view_filters_then_aggregates() {
        let path = temp_csv("view.csv", CSV);
        let data = ingest::load_dataset(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let criteria = FilterCriteria {
            platform: Some("Twitter".to_string()),
            ..Default::default()
        };
        let view = build_view(&data, &criteria, agg::DEFAULT_TOP_LOCATIONS);
        assert_eq!(view.aggregates.n_records, 1);
        assert_eq!(view.aggregates.platform_engagements[0].label, "Twitter");
        assert_eq!(view.aggregates.platform_engagements[0].value, 10);

        let file = to_dashboard_file(&data, &view);
        assert_eq!(file.tool, "mi");
        assert_eq!(file.rows_used, 2);
    }

    #[test]
    fn reload_skips_recleaning_identical_bytes() {
        let path = temp_csv("memo.csv", CSV);
        let mut session = Session::load(&path).unwrap();
        assert_eq!(session.data().rows_used, 2);

        // Same bytes: memoized, no replacement.
        assert!(!session.reload().unwrap());

        // Changed bytes: the dataset is replaced wholesale.
        let extended = format!("{CSV}2024-01-03,7,TikTok,Neutral,Video,SF\n");
        std::fs::write(&path, extended).unwrap();
        assert!(session.reload().unwrap());
        assert_eq!(session.data().rows_used, 3);

        let _ = std::fs::remove_file(&path);
    }
}
