//! Report artifacts
//!
//! Wraps exported text with the file metadata a download collaborator needs,
//! and serializes summaries to JSON for external consumption.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use types::risk::{RiskSummary, RiskSummaryRow};

use crate::csv::DelimitedExporter;

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// A named, typed report body ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

/// Build the legal/compliance report for a given day.
///
/// File name: `legal_report_<YYYY-MM-DD>.csv`.
pub fn legal_report(
    exporter: &DelimitedExporter,
    rows: &[RiskSummaryRow],
    date: NaiveDate,
) -> ReportFile {
    ReportFile {
        file_name: format!("legal_report_{}.csv", date.format("%Y-%m-%d")),
        content_type: CSV_CONTENT_TYPE.to_string(),
        body: exporter.to_delimited_text(rows),
    }
}

/// Export a summary as pretty-printed JSON.
pub fn export_json(summary: &RiskSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_default()
}
