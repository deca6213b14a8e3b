//! Types library for compliance risk aggregation
//!
//! Shared type definitions used by the risk engine, the report exporter and
//! the dashboard API.
//!
//! # Modules
//! - `record`: Raw, schema-less input rows (RawRecord, Batch)
//! - `numeric`: Amount parsing and locale money formatting
//! - `risk`: Risk levels, normalized rows and summary rows
//! - `errors`: Error taxonomy

// Public modules
pub mod record;
pub mod numeric;
pub mod risk;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::record::*;
    pub use crate::numeric::*;
    pub use crate::risk::*;
    pub use crate::errors::*;
}
