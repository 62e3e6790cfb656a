//! Read/write dashboard bundle JSON files.
//!
//! A bundle is the "portable" representation of one filtered dashboard view:
//! source metadata, cleaning counts, the active criteria, and the five
//! aggregated series. `mi export` writes one; `mi show` re-prints it without
//! needing the original CSV. The schema is defined by `domain::DashboardFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::DashboardFile;
use crate::error::AppError;

/// Name `mi export` uses for the bundle inside the output directory.
pub const BUNDLE_FILE_NAME: &str = "dashboard.json";

/// Write a dashboard bundle JSON file.
pub fn write_dashboard_json(path: &Path, dashboard: &DashboardFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create bundle JSON '{}': {e}",
            path.display()
        ))
    })?;

    serde_json::to_writer_pretty(file, dashboard)
        .map_err(|e| AppError::input(format!("Failed to write bundle JSON: {e}")))?;

    Ok(())
}

/// Read a dashboard bundle JSON file.
pub fn read_dashboard_json(path: &Path) -> Result<DashboardFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!(
            "Failed to open bundle JSON '{}': {e}",
            path.display()
        ))
    })?;
    let dashboard: DashboardFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid bundle JSON: {e}")))?;
    Ok(dashboard)
}
