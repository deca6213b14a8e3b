use crate::handlers::risk;
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Uploaded batches can be a full statement export
const MAX_BATCH_BYTES: usize = 32 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/risk/batch", post(risk::upload_batch))
        .route("/risk/refresh", post(risk::refresh))
        .route("/risk/summary", get(risk::summary))
        .route("/risk/export", get(risk::export))
        .layer(DefaultBodyLimit::max(MAX_BATCH_BYTES));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
