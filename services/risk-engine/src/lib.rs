//! Risk Engine
//!
//! Reduces schema-less transaction / legal-operation rows to a risk level and
//! an amount, then aggregates a batch into per-level summary rows.
//!
//! ```text
//! RawRecord ──► normalizer ──► NormalizedRow ──► aggregator ──► RiskSummary
//!                  ▲
//!               config (candidate fields, keywords, synonyms)
//! ```
//!
//! Everything here is pure: the same batch always yields the same summary.

pub mod config;
pub mod normalizer;
pub mod aggregator;
pub mod engine;

pub use aggregator::{aggregate, aggregate_rows, aggregate_with};
pub use config::NormalizerConfig;
pub use engine::RiskEngine;
pub use normalizer::{normalize, RowNormalizer};
