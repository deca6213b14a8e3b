//! Designated default batch
//!
//! Shown by the summary and export views while no batch has been uploaded or
//! fetched. Only the presentation layer reads this; the data-access layer and
//! the aggregation core never substitute it.

use serde_json::json;
use types::record::{Batch, RawRecord};

const LEGAL_OPERATIONS: &[(&str, &str)] = &[
    ("18 000 000 ₽", "низкий"),
    ("6 500 000 ₽", "низкий"),
    ("4 750 000 ₽", "низкий"),
    ("860 000 ₽", "низкий"),
    ("2 950 000 ₽", "средний"),
    ("1 820 000 ₽", "средний"),
    ("2 230 000 ₽", "средний"),
    ("3 100 000 ₽", "высокий"),
    ("1 350 000 ₽", "высокий"),
];

/// Sample legal operations
pub fn default_batch() -> Batch {
    LEGAL_OPERATIONS
        .iter()
        .enumerate()
        .map(|(i, (amount, risk))| {
            RawRecord::new()
                .with("id", json!(i + 1))
                .with("amount", *amount)
                .with("risk", *risk)
        })
        .collect()
}
