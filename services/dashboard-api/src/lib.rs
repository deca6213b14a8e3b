//! Compliance dashboard API
//!
//! Serves risk summaries and CSV exports for the batch of operations most
//! recently uploaded or fetched from the upstream analysis service.

pub mod config;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
