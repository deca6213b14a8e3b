//! Amount parsing and money formatting
//!
//! Amounts are `rust_decimal::Decimal` throughout so that per-risk sums stay
//! exact; rounding only happens when an amount is rendered for display.
//!
//! Parsing is deliberately tolerant: source rows come from spreadsheets with
//! thousands separators, decimal commas and currency signs, and anything that
//! cannot be read as a number counts as zero. Numbers beyond the decimal
//! range clamp to `Decimal::MAX` / `Decimal::MIN`.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Parse an amount field value.
///
/// Numbers are taken as-is, strings go through [`parse_amount_text`],
/// everything else (null, booleans, arrays, objects) is zero.
pub fn parse_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                n.as_f64().map(decimal_from_f64).unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => parse_amount_text(s),
        _ => Decimal::ZERO,
    }
}

/// Convert a float, clamping magnitudes beyond the decimal range.
fn decimal_from_f64(value: f64) -> Decimal {
    if let Some(d) = Decimal::from_f64(value) {
        return d;
    }
    if value.is_nan() || value.abs() < 1.0 {
        return Decimal::ZERO;
    }
    warn!(value, "amount out of decimal range, clamping");
    if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Parse free-form amount text such as `"1 200,50 ₽"`.
///
/// Whitespace is removed, decimal commas become points, every character other
/// than ASCII digits, `.` and `-` is dropped, and the longest leading decimal
/// literal is read. Unparseable text yields zero.
pub fn parse_amount_text(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    leading_decimal(&cleaned).unwrap_or(Decimal::ZERO)
}

/// Read `-?digits[.digits]` from the start of `s`; at least one digit required.
fn leading_decimal(s: &str) -> Option<Decimal> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = &s[frac_start..frac_end];
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut literal = String::with_capacity(int_digits.len() + frac_digits.len() + 3);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(frac_digits);
    }

    // Literals beyond Decimal's 28-digit precision go through f64
    Decimal::from_str(&literal)
        .ok()
        .or_else(|| literal.parse::<f64>().ok().map(decimal_from_f64))
}

/// Locale rules for rendering a monetary amount.
///
/// The same formatter feeds on-screen summary cards and the export's amount
/// column, so both render identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoneyFormat {
    /// Separator between digit groups of three
    pub group_separator: char,
    /// Separator between integer and fraction digits
    pub decimal_separator: char,
    /// Grouping only applies once the integer part has at least
    /// `3 + min_grouping_digits` digits
    pub min_grouping_digits: usize,
    /// Amounts are rounded half away from zero to this many fraction digits
    pub max_fraction_digits: u32,
    /// Appended verbatim after the number
    pub currency_suffix: String,
}

impl MoneyFormat {
    /// Russian ruble format: `1 234 567,5 ₽` with a no-break space between groups.
    pub fn rub() -> Self {
        Self {
            group_separator: '\u{a0}',
            decimal_separator: ',',
            min_grouping_digits: 1,
            max_fraction_digits: 3,
            currency_suffix: " ₽".to_string(),
        }
    }

    /// Render an amount
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount
            .round_dp_with_strategy(self.max_fraction_digits, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let plain = rounded.abs().to_string();
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

        let mut out = String::with_capacity(plain.len() + self.currency_suffix.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(&self.group_digits(int_part));
        if !frac_part.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(frac_part);
        }
        out.push_str(&self.currency_suffix);
        out
    }

    fn group_digits(&self, digits: &str) -> String {
        if digits.len() < 3 + self.min_grouping_digits {
            return digits.to_string();
        }

        let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 2);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(ch);
        }
        out
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::rub()
    }
}

/// Format with the default ruble rules
pub fn format_rub(amount: Decimal) -> String {
    MoneyFormat::rub().format(amount)
}
