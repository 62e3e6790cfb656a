//! Reporting: formatted terminal output for summaries and series tables.
//!
//! Formatting lives in one place so output changes stay localized (important
//! for future snapshot tests) and the pipeline code stays clean.

pub mod format;

pub use format::*;

/// Static campaign recommendation shown under the charts.
///
/// This is editorial content, not something computed from the data.
pub const RECOMMENDATION: &str = "Campaigns focused on visual content on Instagram and TikTok \
have proven effective. Schedule posts around peak engagement hours for maximum reach, and \
consider collaborating with local influencers in the locations showing the most interaction.";
