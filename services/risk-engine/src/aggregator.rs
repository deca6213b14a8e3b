//! Risk aggregation
//!
//! Groups normalized rows by risk level in a single pass and produces one
//! summary row per observed level, most severe first. Rows without a risk
//! level are out of scope for the compliance view and contribute nothing.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};
use types::record::RawRecord;
use types::risk::{NormalizedRow, RiskLevel, RiskSummary, RiskSummaryRow};

use crate::normalizer::RowNormalizer;

/// Running totals for one level.
#[derive(Debug, Default)]
struct LevelAccum {
    count: u64,
    amount: Decimal,
}

/// Aggregate a batch with the default normalizer
pub fn aggregate(records: &[RawRecord]) -> RiskSummary {
    aggregate_with(&RowNormalizer::default(), records)
}

/// Aggregate a batch with the given normalizer
pub fn aggregate_with(normalizer: &RowNormalizer, records: &[RawRecord]) -> RiskSummary {
    let summary = aggregate_rows(records.iter().map(|r| normalizer.normalize(r)));

    debug!(
        records = records.len(),
        included = summary.total_operations,
        skipped = records.len() as u64 - summary.total_operations,
        levels = summary.rows.len(),
        "aggregated risk batch"
    );

    summary
}

/// Add two amounts, clamping at `Decimal::MAX` / `Decimal::MIN` instead of
/// overflowing.
fn add_amount(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        warn!(%total, %amount, "amount sum out of decimal range, clamping");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Fold normalized rows into a summary.
///
/// Sums are exact decimal additions and saturate at the edges of the decimal
/// range; levels with no rows are omitted.
pub fn aggregate_rows<I>(rows: I) -> RiskSummary
where
    I: IntoIterator<Item = NormalizedRow>,
{
    let mut by_risk: BTreeMap<RiskLevel, LevelAccum> = BTreeMap::new();

    for row in rows {
        let Some(risk) = row.risk else {
            continue;
        };
        let acc = by_risk.entry(risk).or_default();
        acc.count += 1;
        acc.amount = add_amount(acc.amount, row.amount);
    }

    // BTreeMap iterates Low..High; reverse for severity descending
    let rows: Vec<RiskSummaryRow> = by_risk
        .into_iter()
        .rev()
        .map(|(risk, acc)| RiskSummaryRow {
            risk,
            operation_count: acc.count,
            total_amount: acc.amount,
        })
        .collect();

    RiskSummary {
        total_amount: rows
            .iter()
            .fold(Decimal::ZERO, |total, r| add_amount(total, r.total_amount)),
        total_operations: rows.iter().map(|r| r.operation_count).sum(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(risk: Option<RiskLevel>, amount: i64) -> NormalizedRow {
        NormalizedRow::new(risk, Decimal::from(amount))
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(&[]);
        assert!(summary.rows.is_empty());
        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert_eq!(summary.total_operations, 0);
    }

    #[test]
    fn test_sums_saturate_instead_of_overflowing() {
        let max_text = "79 228 162 514 264 337 593 543 950 335 ₽";
        let records: Vec<RawRecord> = serde_json::from_value(json!([
            {"risk": "low", "amount": max_text},
            {"risk": "low", "amount": max_text},
            {"risk": "high", "amount": max_text},
        ]))
        .unwrap();

        let summary = aggregate(&records);
        assert_eq!(summary.total_operations, 3);
        assert_eq!(summary.row(RiskLevel::Low).unwrap().total_amount, Decimal::MAX);
        assert_eq!(summary.row(RiskLevel::High).unwrap().total_amount, Decimal::MAX);
        assert_eq!(summary.total_amount, Decimal::MAX);
    }

    #[test]
    fn test_negative_sums_saturate() {
        let summary = aggregate_rows(vec![
            NormalizedRow::new(Some(RiskLevel::Medium), Decimal::MIN),
            NormalizedRow::new(Some(RiskLevel::Medium), Decimal::from(-1)),
        ]);
        assert_eq!(summary.rows[0].total_amount, Decimal::MIN);
        assert_eq!(summary.total_amount, Decimal::MIN);
    }

    #[test]
    fn test_severity_order() {
        let summary = aggregate_rows(vec![
            row(Some(RiskLevel::High), 10),
            row(Some(RiskLevel::Low), 1),
            row(Some(RiskLevel::Low), 2),
            row(Some(RiskLevel::Medium), 5),
        ]);

        let order: Vec<(RiskLevel, u64)> =
            summary.rows.iter().map(|r| (r.risk, r.operation_count)).collect();
        assert_eq!(
            order,
            vec![(RiskLevel::High, 1), (RiskLevel::Medium, 1), (RiskLevel::Low, 2)]
        );
        assert_eq!(summary.row(RiskLevel::Low).unwrap().total_amount, Decimal::from(3));
    }

    #[test]
    fn test_unclassified_rows_excluded() {
        let summary = aggregate_rows(vec![
            row(None, 1_000_000),
            row(Some(RiskLevel::Medium), 250),
            row(None, 7),
        ]);

        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.total_operations, 1);
        assert_eq!(summary.total_amount, Decimal::from(250));
    }

    #[test]
    fn test_absent_levels_not_zero_filled() {
        let summary = aggregate_rows(vec![row(Some(RiskLevel::Low), 3)]);
        assert_eq!(summary.rows.len(), 1);
        assert!(summary.row(RiskLevel::High).is_none());
    }

    #[test]
    fn test_aggregate_raw_records() {
        let records: Vec<RawRecord> = serde_json::from_value(json!([
            {"risk": "высокий", "amount": "3 100 000 ₽"},
            {"risk": "низкий", "amount": "860 000 ₽"},
            {"risk": "high", "amount": 1350000},
            {"counterparty": "no risk column", "amount": 99},
        ]))
        .unwrap();

        let summary = aggregate(&records);
        assert_eq!(summary.total_operations, 3);
        assert_eq!(summary.total_amount, Decimal::from(5_310_000));
        assert_eq!(summary.rows[0].risk, RiskLevel::High);
        assert_eq!(summary.rows[0].total_amount, Decimal::from(4_450_000));
        assert_eq!(summary.rows[1].risk, RiskLevel::Low);
    }
}
