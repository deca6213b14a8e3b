//! Risk Engine — orchestrator
//!
//! Binds a normalizer configuration to the aggregation pipeline so callers
//! holding a loaded configuration do not rebuild it per batch.

use std::path::Path;

use tracing::info;
use types::errors::ConfigError;
use types::record::RawRecord;
use types::risk::{NormalizedRow, RiskSummary};

use crate::aggregator;
use crate::config::NormalizerConfig;
use crate::normalizer::RowNormalizer;

/// Risk engine service
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    normalizer: RowNormalizer,
}

impl RiskEngine {
    /// Create a new risk engine with the default field configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new risk engine with custom configuration
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self {
            normalizer: RowNormalizer::new(config),
        }
    }

    /// Create a risk engine from a JSON field configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = NormalizerConfig::load(path)?;
        info!(
            path = %path.display(),
            risk_candidates = config.risk_field.candidates.len(),
            amount_candidates = config.amount_field.candidates.len(),
            "loaded field configuration"
        );
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> &NormalizerConfig {
        self.normalizer.config()
    }

    /// Normalize a single record
    pub fn normalize(&self, record: &RawRecord) -> NormalizedRow {
        self.normalizer.normalize(record)
    }

    /// Aggregate a full batch. Recomputes from scratch on every call.
    pub fn aggregate(&self, records: &[RawRecord]) -> RiskSummary {
        aggregator::aggregate_with(&self.normalizer, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::io::Write;
    use types::risk::RiskLevel;

    #[test]
    fn test_engine_uses_custom_config() {
        let mut config = NormalizerConfig::default();
        config.amount_field.candidates = vec!["debit".to_string()];
        let engine = RiskEngine::with_config(config);

        let record: RawRecord =
            serde_json::from_value(json!({"risk": "medium", "debit": "40", "amount": "1"})).unwrap();
        let row = engine.normalize(&record);
        assert_eq!(row.risk, Some(RiskLevel::Medium));
        assert_eq!(row.amount, Decimal::from(40));
    }

    #[test]
    fn test_engine_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"risk_field": {{"candidates": ["grade"], "keywords": []}},
                "amount_field": {{"candidates": ["debit"], "keywords": []}}}}"#
        )
        .unwrap();

        let engine = RiskEngine::from_config_file(file.path()).unwrap();
        assert_eq!(engine.config().risk_field.candidates, vec!["grade".to_string()]);

        let record: RawRecord = serde_json::from_value(json!({
            "risk": "low",
            "grade": "high",
            "amount": "1",
            "debit": "2 500",
        }))
        .unwrap();
        let row = engine.normalize(&record);
        assert_eq!(row.risk, Some(RiskLevel::High));
        assert_eq!(row.amount, Decimal::from(2500));
    }

    #[test]
    fn test_engine_from_missing_config_file() {
        let err = RiskEngine::from_config_file("/nonexistent/fields.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_engine_aggregate_matches_free_function() {
        let records: Vec<RawRecord> = serde_json::from_value(json!([
            {"risk": "low", "amount": 5},
            {"risk": "high", "amount": 8},
        ]))
        .unwrap();

        let engine = RiskEngine::new();
        assert_eq!(engine.aggregate(&records), aggregator::aggregate(&records));
    }
}
