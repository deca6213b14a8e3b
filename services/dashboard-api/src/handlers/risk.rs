use axum::{
    Json,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use types::record::Batch;

use crate::error::AppError;
use crate::models::{BatchOrigin, SummaryView};
use crate::state::AppState;

pub async fn upload_batch(
    State(state): State<AppState>,
    Json(records): Json<Batch>,
) -> Json<SummaryView> {
    Json(state.load_batch(BatchOrigin::Upload, records).await)
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<SummaryView>, AppError> {
    Ok(Json(state.refresh().await?))
}

pub async fn summary(State(state): State<AppState>) -> Json<SummaryView> {
    Json(state.view().await)
}

pub async fn export(State(state): State<AppState>) -> Result<Response, AppError> {
    let report = state.export(Utc::now().date_naive()).await;

    let content_type = HeaderValue::from_str(&report.content_type)
        .map_err(|e| AppError::InternalError(e.into()))?;
    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", report.file_name))
            .map_err(|e| AppError::InternalError(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.body,
    )
        .into_response())
}
