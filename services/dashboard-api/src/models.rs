use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::MoneyFormat;
use types::risk::{LevelTotal, RiskLevel, RiskSummary};

/// Where the summarised batch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOrigin {
    Upload,
    Upstream,
    /// Designated default batch; nothing has been loaded yet
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRowView {
    pub risk: RiskLevel,
    pub label: String,
    pub operation_count: u64,
    pub total_amount: Decimal,
    pub formatted_amount: String,
}

/// Summary cards, totals and chart series for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryView {
    pub source: BatchOrigin,
    pub loaded_at: Option<DateTime<Utc>>,
    pub record_count: usize,
    pub rows: Vec<SummaryRowView>,
    pub total_amount: Decimal,
    pub formatted_total: String,
    pub total_operations: u64,
    /// Every level, zero-filled
    pub breakdown: Vec<LevelTotal>,
    pub last_error: Option<String>,
}

impl SummaryView {
    pub fn build(
        source: BatchOrigin,
        loaded_at: Option<DateTime<Utc>>,
        record_count: usize,
        summary: &RiskSummary,
        money: &MoneyFormat,
        last_error: Option<String>,
    ) -> Self {
        let rows = summary
            .rows
            .iter()
            .map(|row| SummaryRowView {
                risk: row.risk,
                label: row.risk.local_label().to_string(),
                operation_count: row.operation_count,
                total_amount: row.total_amount,
                formatted_amount: row.formatted_amount(money),
            })
            .collect();

        Self {
            source,
            loaded_at,
            record_count,
            rows,
            total_amount: summary.total_amount,
            formatted_total: money.format(summary.total_amount),
            total_operations: summary.total_operations,
            breakdown: summary.breakdown().to_vec(),
            last_error,
        }
    }
}
