//! Normalizer configuration
//!
//! Which field names hold the risk level and the amount differs between
//! source files, so the candidate lists, fallback keywords and synonym groups
//! are data rather than constants. The defaults cover the Russian and English
//! spellings seen in uploaded statements.

use serde::{Deserialize, Serialize};
use std::path::Path;
use types::errors::ConfigError;
use types::risk::RiskLevel;

/// How to locate one logical field in a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldCandidates {
    /// Exact field names, in priority order
    pub candidates: Vec<String>,
    /// Lower-case fragments matched against lower-cased field names when no
    /// candidate is present
    pub keywords: Vec<String>,
}

/// Spellings that map to one risk level. All entries are lower case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymGroup {
    /// Whole-value matches
    pub exact: Vec<String>,
    /// Substring matches, tried after every group's exact list
    pub fragments: Vec<String>,
}

/// Synonym groups for the three levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskVocabulary {
    pub high: SynonymGroup,
    pub medium: SynonymGroup,
    pub low: SynonymGroup,
}

impl RiskVocabulary {
    /// Groups in match priority order (most severe first)
    pub fn groups(&self) -> [(RiskLevel, &SynonymGroup); 3] {
        [
            (RiskLevel::High, &self.high),
            (RiskLevel::Medium, &self.medium),
            (RiskLevel::Low, &self.low),
        ]
    }
}

impl Default for RiskVocabulary {
    fn default() -> Self {
        Self {
            high: group(&["high", "высокий", "высокий риск"], &["high", "высок", "крас"]),
            medium: group(
                &["medium", "средний", "средний риск"],
                &["med", "сред", "жёлт", "желт"],
            ),
            low: group(&["low", "низкий", "низкий риск"], &["low", "низк", "зел"]),
        }
    }
}

/// Full normalizer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub risk_field: FieldCandidates,
    pub amount_field: FieldCandidates,
    pub vocabulary: RiskVocabulary,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            risk_field: FieldCandidates {
                candidates: strings(&[
                    "risk_level",
                    "risk",
                    "уровень риска",
                    "уровень_риска",
                    "риск",
                    "risk level",
                    "Risk",
                    "Risk Level",
                    "Уровень риска",
                    "Риск",
                ]),
                keywords: strings(&["risk", "риск"]),
            },
            amount_field: FieldCandidates {
                candidates: strings(&[
                    "amount",
                    "сумма",
                    "объем",
                    "объём",
                    "total_amount",
                    "transaction_amount",
                    "value",
                    "sum",
                    "Amount",
                    "Сумма",
                ]),
                keywords: strings(&["amount", "sum", "сум"]),
            },
            vocabulary: RiskVocabulary::default(),
        }
    }
}

impl NormalizerConfig {
    /// Parse and validate a JSON document. Missing sections keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: NormalizerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject entries that would never match or would match everything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, field) in [("risk_field", &self.risk_field), ("amount_field", &self.amount_field)] {
            if field.candidates.iter().any(|c| c.is_empty()) {
                return Err(ConfigError::invalid(
                    format!("{name}.candidates"),
                    "empty field name",
                ));
            }
            check_matchers(&format!("{name}.keywords"), &field.keywords)?;
        }

        for (level, group) in self.vocabulary.groups() {
            let prefix = format!("vocabulary.{}", level.label().to_lowercase());
            check_matchers(&format!("{prefix}.exact"), &group.exact)?;
            check_matchers(&format!("{prefix}.fragments"), &group.fragments)?;
        }

        Ok(())
    }
}

/// Matchers compare against trimmed, lower-cased text.
fn check_matchers(field: &str, entries: &[String]) -> Result<(), ConfigError> {
    for entry in entries {
        if entry.trim().is_empty() {
            return Err(ConfigError::invalid(field, "blank entry matches every value"));
        }
        if *entry != entry.to_lowercase() || entry.trim() != entry {
            return Err(ConfigError::invalid(
                field,
                format!("'{entry}' must be trimmed lower case"),
            ));
        }
    }
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn group(exact: &[&str], fragments: &[&str]) -> SynonymGroup {
    SynonymGroup {
        exact: strings(exact),
        fragments: strings(fragments),
    }
}
