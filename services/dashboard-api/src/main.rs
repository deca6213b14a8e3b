use std::sync::Arc;

use dashboard_api::config::ApiConfig;
use dashboard_api::fetch::{BatchSource, HttpBatchSource};
use dashboard_api::router::create_router;
use dashboard_api::state::AppState;
use report_export::{DelimitedExporter, ExportConfig};
use risk_engine::RiskEngine;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting compliance dashboard API");

    let config = ApiConfig::from_env()?;

    let engine = match &config.fields_config {
        Some(path) => RiskEngine::from_config_file(path)?,
        None => RiskEngine::new(),
    };

    let exporter = match &config.export_config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading export layout");
            DelimitedExporter::new(ExportConfig::load(path)?)
        }
        None => DelimitedExporter::default(),
    };

    let source = match &config.upstream_url {
        Some(url) => {
            tracing::info!(upstream = %url, "batch refresh enabled");
            Some(Arc::new(HttpBatchSource::new(url.clone(), config.fetch_timeout)?) as Arc<dyn BatchSource>)
        }
        None => None,
    };

    let state = AppState::new(engine, exporter, source);
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;

    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
