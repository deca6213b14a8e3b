//! Risk classification and summary types
//!
//! A normalized row carries only what the compliance view needs: the risk
//! level and the amount. Summary rows aggregate those per level.

use crate::numeric::MoneyFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compliance risk level. Ordering follows severity (Low < Medium < High).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// All levels, most severe first
    pub const BY_SEVERITY: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    /// Severity weight: High=3, Medium=2, Low=1
    pub fn severity(self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }

    /// English label
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Russian label as shown in the source reports
    pub fn local_label(self) -> &'static str {
        match self {
            RiskLevel::Low => "низкий",
            RiskLevel::Medium => "средний",
            RiskLevel::High => "высокий",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            RiskLevel::High => 0,
            RiskLevel::Medium => 1,
            RiskLevel::Low => 2,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record reduced to its risk level and amount.
///
/// `risk` is `None` when the record has no recognizable risk field; such rows
/// are out of scope for the compliance view and never aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub risk: Option<RiskLevel>,
    pub amount: Decimal,
}

impl NormalizedRow {
    pub fn new(risk: Option<RiskLevel>, amount: Decimal) -> Self {
        Self { risk, amount }
    }
}

/// Aggregated count and total for one observed risk level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummaryRow {
    pub risk: RiskLevel,
    pub operation_count: u64,
    pub total_amount: Decimal,
}

impl RiskSummaryRow {
    /// Display form of the total, shared by summary cards and the export
    pub fn formatted_amount(&self, format: &MoneyFormat) -> String {
        format.format(self.total_amount)
    }
}

/// Per-level totals including levels with no operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTotal {
    pub risk: RiskLevel,
    pub operation_count: u64,
    pub total_amount: Decimal,
}

/// Result of aggregating one batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskSummary {
    /// One row per observed level, most severe first
    pub rows: Vec<RiskSummaryRow>,
    pub total_amount: Decimal,
    pub total_operations: u64,
}

impl RiskSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Summary row for a level, if that level was observed
    pub fn row(&self, risk: RiskLevel) -> Option<&RiskSummaryRow> {
        self.rows.iter().find(|r| r.risk == risk)
    }

    /// Totals for every level in severity order, zero-filled for absent levels
    pub fn breakdown(&self) -> [LevelTotal; 3] {
        let mut totals = RiskLevel::BY_SEVERITY.map(|risk| LevelTotal {
            risk,
            operation_count: 0,
            total_amount: Decimal::ZERO,
        });
        for row in &self.rows {
            let slot = &mut totals[row.risk.index()];
            slot.operation_count = row.operation_count;
            slot.total_amount = row.total_amount;
        }
        totals
    }
}
