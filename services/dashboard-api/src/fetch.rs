//! Batch data access
//!
//! Fetches a fresh record batch from the upstream analysis service. Failures
//! are returned as [`FetchError`]; substituting a default batch is a
//! presentation concern and never happens here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use types::record::Batch;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no upstream batch source configured")]
    NotConfigured,

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream payload is not a record batch: {0}")]
    Decode(String),
}

/// Anything that can deliver a complete record batch.
#[async_trait]
pub trait BatchSource: Send + Sync {
    async fn fetch_batch(&self) -> Result<Batch, FetchError>;

    /// Human-readable origin for logs
    fn describe(&self) -> String;
}

/// Accepted upstream payload shapes: a bare array, or an analysis payload
/// carrying its rows under `transactions` (or `rows`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchPayload {
    Bare(Batch),
    Wrapped {
        #[serde(alias = "rows")]
        transactions: Batch,
    },
}

impl From<BatchPayload> for Batch {
    fn from(payload: BatchPayload) -> Self {
        match payload {
            BatchPayload::Bare(batch) => batch,
            BatchPayload::Wrapped { transactions } => transactions,
        }
    }
}

/// Parse an upstream response body into a batch
pub fn decode_batch(body: &[u8]) -> Result<Batch, FetchError> {
    serde_json::from_slice::<BatchPayload>(body)
        .map(Batch::from)
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// HTTP GET source returning JSON
#[derive(Debug, Clone)]
pub struct HttpBatchSource {
    client: Client,
    url: String,
}

impl HttpBatchSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl BatchSource for HttpBatchSource {
    async fn fetch_batch(&self) -> Result<Batch, FetchError> {
        let res = self.client.get(&self.url).send().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "upstream request failed");
            FetchError::Transport(e.to_string())
        })?;

        let status = res.status();
        if !status.is_success() {
            warn!(url = %self.url, status = status.as_u16(), "upstream rejected request");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let batch = decode_batch(&body)?;

        debug!(url = %self.url, records = batch.len(), "fetched batch");
        Ok(batch)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
