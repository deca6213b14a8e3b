//! Risk report export
//!
//! Turns aggregated risk summaries into downloadable artifacts.
//!
//! # Modules
//! - `csv` — Semicolon-delimited summary table
//! - `report` — Report file naming and JSON export
//!
//! Writing the artifact somewhere (browser download, disk) is left to the
//! caller.

pub mod csv;
pub mod report;

pub use csv::{to_delimited_text, DelimitedExporter, ExportConfig, LabelStyle};
pub use report::{export_json, legal_report, ReportFile};

/// Crate version constant
pub const VERSION: &str = "1.0.0";
