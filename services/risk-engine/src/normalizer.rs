//! Row normalizer
//!
//! Extracts a risk level and an amount from one schema-less record. Each
//! logical field is located by walking a prioritized list of exact field
//! names, then falling back to the first field whose name contains a keyword.
//! Missing, null or malformed values never fail: risk becomes `None` and the
//! amount becomes zero.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::trace;
use types::numeric::parse_amount;
use types::record::{value_text, RawRecord};
use types::risk::{NormalizedRow, RiskLevel};

use crate::config::{FieldCandidates, NormalizerConfig};

/// Normalize with the default configuration
pub fn normalize(record: &RawRecord) -> NormalizedRow {
    RowNormalizer::default().normalize(record)
}

/// Record normalizer bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct RowNormalizer {
    config: NormalizerConfig,
}

impl RowNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Reduce a record to its risk level and amount
    pub fn normalize(&self, record: &RawRecord) -> NormalizedRow {
        NormalizedRow::new(self.extract_risk(record), self.extract_amount(record))
    }

    /// Risk level of a record, `None` when no recognizable risk value exists.
    ///
    /// The first candidate holding non-blank text decides; a candidate whose
    /// text matches no synonym does not fall through to later candidates.
    pub fn extract_risk(&self, record: &RawRecord) -> Option<RiskLevel> {
        let value = select_field(record, &self.config.risk_field, has_text, "risk")?;
        self.classify(&value_text(value)?)
    }

    /// Amount of a record, zero when absent or unparseable
    pub fn extract_amount(&self, record: &RawRecord) -> Decimal {
        select_field(record, &self.config.amount_field, is_present, "amount")
            .map(parse_amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Map free-form risk text onto a level.
    ///
    /// Exact synonyms are checked for every level before any substring
    /// fragment, so `"low"` never reaches the fragment pass.
    pub fn classify(&self, text: &str) -> Option<RiskLevel> {
        let value = text.trim().to_lowercase();
        if value.is_empty() {
            return None;
        }

        let groups = self.config.vocabulary.groups();
        groups
            .iter()
            .find(|(_, group)| group.exact.iter().any(|s| *s == value))
            .or_else(|| {
                groups
                    .iter()
                    .find(|(_, group)| group.fragments.iter().any(|f| value.contains(f.as_str())))
            })
            .map(|(level, _)| *level)
    }
}

fn has_text(value: &Value) -> bool {
    value_text(value).is_some_and(|s| !s.trim().is_empty())
}

fn is_present(value: &Value) -> bool {
    !matches!(value, Value::Null) && value.as_str() != Some("")
}

fn select_field<'a>(
    record: &'a RawRecord,
    field: &FieldCandidates,
    usable: fn(&Value) -> bool,
    purpose: &'static str,
) -> Option<&'a Value> {
    if let Some(value) = field
        .candidates
        .iter()
        .filter_map(|name| record.get(name))
        .find(|value| usable(value))
    {
        return Some(value);
    }

    let (name, value) = record.fields().find(|(name, _)| {
        let lower = name.to_lowercase();
        field.keywords.iter().any(|k| lower.contains(k.as_str()))
    })?;
    trace!(field = name, purpose, "resolved field by keyword fallback");
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynonymGroup;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_classify_exact_synonyms() {
        let n = RowNormalizer::default();
        assert_eq!(n.classify("высокий риск"), Some(RiskLevel::High));
        assert_eq!(n.classify("low"), Some(RiskLevel::Low));
        assert_eq!(n.classify("  Medium "), Some(RiskLevel::Medium));
        assert_eq!(n.classify("СРЕДНИЙ"), Some(RiskLevel::Medium));
    }

    #[test]
    fn test_classify_fragments() {
        let n = RowNormalizer::default();
        assert_eq!(n.classify("high-risk"), Some(RiskLevel::High));
        assert_eq!(n.classify("красный"), Some(RiskLevel::High));
        assert_eq!(n.classify("жёлтая зона"), Some(RiskLevel::Medium));
        assert_eq!(n.classify("зелёный"), Some(RiskLevel::Low));
        assert_eq!(n.classify("Lowest"), Some(RiskLevel::Low));
    }

    #[test]
    fn test_classify_unknown() {
        let n = RowNormalizer::default();
        assert_eq!(n.classify(""), None);
        assert_eq!(n.classify("   "), None);
        assert_eq!(n.classify("n/a"), None);
    }

    #[test]
    fn test_normalize_candidate_fields() {
        let row = normalize(&record(json!({
            "id": 8,
            "amount": "3 100 000 ₽",
            "risk": "высокий",
        })));
        assert_eq!(row.risk, Some(RiskLevel::High));
        assert_eq!(row.amount, Decimal::from(3_100_000));
    }

    #[test]
    fn test_candidate_priority() {
        // risk_level outranks risk regardless of field order
        let row = normalize(&record(json!({"risk": "low", "risk_level": "high"})));
        assert_eq!(row.risk, Some(RiskLevel::High));

        let row = normalize(&record(json!({"sum": 5, "amount": 7})));
        assert_eq!(row.amount, Decimal::from(7));
    }

    #[test]
    fn test_empty_candidate_skipped() {
        let row = normalize(&record(json!({"risk_level": "", "risk": "medium", "amount": null, "сумма": "900"})));
        assert_eq!(row.risk, Some(RiskLevel::Medium));
        assert_eq!(row.amount, Decimal::from(900));
    }

    #[test]
    fn test_unmatched_candidate_decides() {
        let row = normalize(&record(json!({"risk_level": "n/a", "risk": "high"})));
        assert_eq!(row.risk, None);
    }

    #[test]
    fn test_keyword_fallback() {
        let row = normalize(&record(json!({
            "Оценка риска контрагента": "Низкий",
            "Сумма платежа, руб.": "12 500,75",
        })));
        assert_eq!(row.risk, Some(RiskLevel::Low));
        assert_eq!(row.amount, Decimal::new(1250075, 2));

        let row = normalize(&record(json!({"RiskScore": "HIGH", "TotalAmountRub": 40})));
        assert_eq!(row.risk, Some(RiskLevel::High));
        assert_eq!(row.amount, Decimal::from(40));
    }

    #[test]
    fn test_missing_fields() {
        let row = normalize(&record(json!({"counterparty": "ООО «Астра»", "inn": "7712458790"})));
        assert_eq!(row.risk, None);
        assert_eq!(row.amount, Decimal::ZERO);

        let row = normalize(&RawRecord::new());
        assert_eq!(row, NormalizedRow::new(None, Decimal::ZERO));
    }

    #[test]
    fn test_unparseable_amount() {
        let row = normalize(&record(json!({"risk": "low", "amount": "abc"})));
        assert_eq!(row.amount, Decimal::ZERO);

        let row = normalize(&record(json!({"risk": "low", "amount": 1200.5})));
        assert_eq!(row.amount, Decimal::new(12005, 1));
    }

    #[test]
    fn test_numeric_risk_value_is_unrecognized() {
        let row = normalize(&record(json!({"risk": 3, "amount": 10})));
        assert_eq!(row.risk, None);
    }

    #[test]
    fn test_custom_config() {
        let mut config = NormalizerConfig::default();
        config.risk_field.candidates = vec!["grade".to_string()];
        config.risk_field.keywords.clear();
        config.vocabulary.high = SynonymGroup {
            exact: vec!["a".to_string()],
            fragments: vec![],
        };
        let n = RowNormalizer::new(config);

        let row = n.normalize(&record(json!({"grade": "A", "risk": "low"})));
        assert_eq!(row.risk, Some(RiskLevel::High));

        let row = n.normalize(&record(json!({"risk": "low"})));
        assert_eq!(row.risk, None);
    }
}
