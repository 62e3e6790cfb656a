//! Input/output helpers.
//!
//! - CSV ingest + cleaning (`ingest`)
//! - per-series CSV exports (`export`)
//! - dashboard bundle JSON read/write (`bundle`)

pub mod bundle;
pub mod export;
pub mod ingest;

pub use bundle::*;
pub use export::*;
pub use ingest::*;
