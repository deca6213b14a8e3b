//! Delimited-text export of risk summary rows
//!
//! The target locale writes decimals with a comma, so fields are separated by
//! semicolons. A field containing a comma, the delimiter, a double quote or a
//! line break is wrapped in double quotes with inner quotes doubled.
//!
//! The amount column holds the display string from [`MoneyFormat`], the same
//! text the dashboard shows on its summary cards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use types::errors::ConfigError;
use types::numeric::MoneyFormat;
use types::risk::{RiskLevel, RiskSummaryRow};

/// How risk levels are spelled in the export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// High / Medium / Low
    #[default]
    English,
    /// высокий / средний / низкий
    Local,
    Custom {
        high: String,
        medium: String,
        low: String,
    },
}

impl LabelStyle {
    pub fn label(&self, risk: RiskLevel) -> &str {
        match self {
            LabelStyle::English => risk.label(),
            LabelStyle::Local => risk.local_label(),
            LabelStyle::Custom { high, medium, low } => match risk {
                RiskLevel::High => high.as_str(),
                RiskLevel::Medium => medium.as_str(),
                RiskLevel::Low => low.as_str(),
            },
        }
    }
}

/// Export layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub delimiter: char,
    /// Column titles: risk, operation count, total amount
    pub headers: [String; 3],
    pub labels: LabelStyle,
    pub money: MoneyFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            headers: [
                "Risk".to_string(),
                "Operation Count".to_string(),
                "Total Amount".to_string(),
            ],
            labels: LabelStyle::default(),
            money: MoneyFormat::rub(),
        }
    }
}

impl ExportConfig {
    /// Parse and validate a JSON layout; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ExportConfig = serde_json::from_str(json)?;
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

    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ConfigError::invalid(
                "delimiter",
                "must not be a quote or line break",
            ));
        }
        if self.money.max_fraction_digits > 28 {
            return Err(ConfigError::invalid(
                "money.max_fraction_digits",
                "at most 28",
            ));
        }
        Ok(())
    }
}

/// Summary table exporter
#[derive(Debug, Clone, Default)]
pub struct DelimitedExporter {
    config: ExportConfig,
}

impl DelimitedExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Header line followed by one line per row, joined by `\n`.
    /// No trailing newline; an empty slice yields just the header.
    pub fn to_delimited_text(&self, rows: &[RiskSummaryRow]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(self.line(self.config.headers.iter().map(String::as_str)));

        for row in rows {
            let count = row.operation_count.to_string();
            let amount = row.formatted_amount(&self.config.money);
            lines.push(self.line([
                self.config.labels.label(row.risk),
                count.as_str(),
                amount.as_str(),
            ]));
        }

        lines.join("\n")
    }

    fn line<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> String {
        let delimiter = self.config.delimiter.to_string();
        fields
            .into_iter()
            .map(|f| escape_field(f, self.config.delimiter))
            .collect::<Vec<_>>()
            .join(&delimiter)
    }
}

/// Export with the default layout
pub fn to_delimited_text(rows: &[RiskSummaryRow]) -> String {
    DelimitedExporter::default().to_delimited_text(rows)
}

/// Quote a field if it contains a comma, the delimiter, a quote or a line break.
pub fn escape_field(field: &str, delimiter: char) -> String {
    let needs_quotes = field
        .chars()
        .any(|c| matches!(c, ',' | ';' | '"' | '\n' | '\r') || c == delimiter);

    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn summary_row(risk: RiskLevel, count: u64, amount: Decimal) -> RiskSummaryRow {
        RiskSummaryRow {
            risk,
            operation_count: count,
            total_amount: amount,
        }
    }

    #[test]
    fn test_empty_rows_header_only() {
        assert_eq!(to_delimited_text(&[]), "Risk;Operation Count;Total Amount");
    }

    #[test]
    fn test_rows_in_given_order() {
        let text = to_delimited_text(&[
            summary_row(RiskLevel::High, 2, Decimal::from(4_450_000)),
            summary_row(RiskLevel::Low, 4, Decimal::from(860)),
        ]);

        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "High;2;4\u{a0}450\u{a0}000 ₽");
        assert_eq!(lines[2], "Low;4;860 ₽");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_amount_matches_card_text() {
        let row = summary_row(RiskLevel::Medium, 3, Decimal::from(7_000_000));
        let exporter = DelimitedExporter::default();
        let text = exporter.to_delimited_text(std::slice::from_ref(&row));
        let card = row.formatted_amount(&exporter.config().money);
        assert!(text.ends_with(&format!(";{card}")));
    }

    #[test]
    fn test_fractional_amount_is_quoted() {
        let text = to_delimited_text(&[summary_row(RiskLevel::Low, 1, Decimal::new(12005, 1))]);
        assert_eq!(text.lines().nth(1), Some("Low;1;\"1\u{a0}200,5 ₽\""));
    }

    #[test]
    fn test_label_with_semicolon_is_quoted() {
        let exporter = DelimitedExporter::new(ExportConfig {
            labels: LabelStyle::Custom {
                high: "High; escalate".to_string(),
                medium: "Medium".to_string(),
                low: "Low".to_string(),
            },
            ..ExportConfig::default()
        });

        let text = exporter.to_delimited_text(&[summary_row(RiskLevel::High, 1, Decimal::from(5))]);
        assert_eq!(text.lines().nth(1), Some("\"High; escalate\";1;5 ₽"));
    }

    #[test]
    fn test_local_labels() {
        let exporter = DelimitedExporter::new(ExportConfig {
            labels: LabelStyle::Local,
            ..ExportConfig::default()
        });
        let text = exporter.to_delimited_text(&[summary_row(RiskLevel::Medium, 3, Decimal::from(10))]);
        assert_eq!(text.lines().nth(1), Some("средний;3;10 ₽"));
    }

    #[test]
    fn test_partial_json_config() {
        let config = ExportConfig::from_json_str(
            r#"{"labels": "local", "money": {"currency_suffix": " RUB"}}"#,
        )
        .unwrap();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.labels, LabelStyle::Local);
        assert_eq!(config.money.group_separator, '\u{a0}');

        let exporter = DelimitedExporter::new(config);
        let text = exporter.to_delimited_text(&[summary_row(RiskLevel::Low, 2, Decimal::from(1500))]);
        assert_eq!(text.lines().nth(1), Some("низкий;2;1\u{a0}500 RUB"));
    }

    #[test]
    fn test_custom_labels_from_json() {
        let config = ExportConfig::from_json_str(
            r#"{"delimiter": "\t", "labels": {"custom": {"high": "H", "medium": "M", "low": "L"}}}"#,
        )
        .unwrap();
        let text = DelimitedExporter::new(config)
            .to_delimited_text(&[summary_row(RiskLevel::Medium, 1, Decimal::from(7))]);
        assert_eq!(text, "Risk\tOperation Count\tTotal Amount\nM\t1\t7 ₽");
    }

    #[test]
    fn test_config_rejects_quote_delimiter() {
        let err = ExportConfig::from_json_str(r#"{"delimiter": "\""}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = ExportConfig::from_json_str(r#"{"delimiter": 5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"headers": ["Уровень", "Операции", "Сумма"]}}"#).unwrap();

        let config = ExportConfig::load(file.path()).unwrap();
        assert_eq!(config.headers[0], "Уровень");
        assert_eq!(config.labels, LabelStyle::English);

        let err = ExportConfig::load("/nonexistent/export.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain", ';'), "plain");
        assert_eq!(escape_field("a,b", ';'), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\"", ';'), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines", ';'), "\"two\nlines\"");
        assert_eq!(escape_field("tab\tsep", '\t'), "\"tab\tsep\"");
        assert_eq!(escape_field("", ';'), "");
    }
}
