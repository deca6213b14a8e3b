use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use report_export::{DelimitedExporter, ReportFile, legal_report};
use risk_engine::RiskEngine;
use tokio::sync::RwLock;
use tracing::{info, warn};
use types::record::Batch;
use types::risk::RiskSummary;

use crate::error::AppError;
use crate::fallback;
use crate::fetch::{BatchSource, FetchError};
use crate::models::{BatchOrigin, SummaryView};

/// A batch together with the summary computed from it.
#[derive(Debug, Clone)]
pub struct LoadedBatch {
    pub origin: BatchOrigin,
    pub records: Batch,
    pub summary: RiskSummary,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedBatch {
    /// Aggregate `records` from scratch
    pub fn compute(engine: &RiskEngine, origin: BatchOrigin, records: Batch) -> Self {
        let summary = engine.aggregate(&records);
        Self {
            origin,
            records,
            summary,
            loaded_at: Utc::now(),
        }
    }
}

/// Dashboard data shared by every view.
///
/// Mutated only through [`DashboardState::replace_batch`] and
/// [`DashboardState::record_failure`].
#[derive(Debug, Default)]
pub struct DashboardState {
    current: Option<LoadedBatch>,
    last_error: Option<String>,
}

impl DashboardState {
    /// Replace the batch wholesale and clear any stored failure
    pub fn replace_batch(&mut self, batch: LoadedBatch) {
        self.current = Some(batch);
        self.last_error = None;
    }

    /// Remember a failed load. The previous batch stays current.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn current(&self) -> Option<&LoadedBatch> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RiskEngine>,
    pub exporter: Arc<DelimitedExporter>,
    source: Option<Arc<dyn BatchSource>>,
    dashboard: Arc<RwLock<DashboardState>>,
    fallback: Arc<LoadedBatch>,
}

impl AppState {
    pub fn new(
        engine: RiskEngine,
        exporter: DelimitedExporter,
        source: Option<Arc<dyn BatchSource>>,
    ) -> Self {
        let fallback = LoadedBatch::compute(&engine, BatchOrigin::Fallback, fallback::default_batch());
        Self {
            engine: Arc::new(engine),
            exporter: Arc::new(exporter),
            source,
            dashboard: Arc::new(RwLock::new(DashboardState::default())),
            fallback: Arc::new(fallback),
        }
    }

    /// Summarise and store a batch
    pub async fn load_batch(&self, origin: BatchOrigin, records: Batch) -> SummaryView {
        let loaded = LoadedBatch::compute(&self.engine, origin, records);
        info!(
            origin = ?origin,
            records = loaded.records.len(),
            operations = loaded.summary.total_operations,
            "batch loaded"
        );

        let view = self.render(&loaded, None);
        self.dashboard.write().await.replace_batch(loaded);
        view
    }

    /// Pull a fresh batch from the upstream source.
    ///
    /// A failure leaves the current batch in place and is reported in
    /// subsequent views.
    pub async fn refresh(&self) -> Result<SummaryView, AppError> {
        let fetched = match &self.source {
            Some(source) => source.fetch_batch().await,
            None => Err(FetchError::NotConfigured),
        };

        match fetched {
            Ok(records) => Ok(self.load_batch(BatchOrigin::Upstream, records).await),
            Err(err) => {
                let origin = self
                    .source
                    .as_ref()
                    .map(|s| s.describe())
                    .unwrap_or_else(|| "none".to_string());
                warn!(
                    source = %origin,
                    error = %err,
                    "batch refresh failed"
                );
                self.dashboard.write().await.record_failure(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Current view; the default batch stands in until something is loaded.
    pub async fn view(&self) -> SummaryView {
        let dashboard = self.dashboard.read().await;
        let last_error = dashboard.last_error().map(str::to_string);
        match dashboard.current() {
            Some(loaded) => self.render(loaded, last_error),
            None => self.render(&self.fallback, last_error),
        }
    }

    /// CSV report of the rows shown by [`AppState::view`]
    pub async fn export(&self, date: NaiveDate) -> ReportFile {
        let dashboard = self.dashboard.read().await;
        let loaded = dashboard.current().unwrap_or(&self.fallback);
        legal_report(&self.exporter, &loaded.summary.rows, date)
    }

    fn render(&self, loaded: &LoadedBatch, last_error: Option<String>) -> SummaryView {
        let loaded_at = (loaded.origin != BatchOrigin::Fallback).then_some(loaded.loaded_at);
        SummaryView::build(
            loaded.origin,
            loaded_at,
            loaded.records.len(),
            &loaded.summary,
            &self.exporter.config().money,
            last_error,
        )
    }
}
