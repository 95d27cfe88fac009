//! Axum route handlers for the quality metrics API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::extract::AppQuery;
use crate::metrics::aggregate::{load_report, QualityReport, TimeWindow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    #[serde(default)]
    pub window: TimeWindow,
}

/// GET /api/v1/quality/metrics?window=today|weekly
///
/// An empty or unreadable log reports `no_data`; only an unknown window is rejected.
pub async fn handle_quality_metrics(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MetricsQuery>,
) -> Result<Json<QualityReport>, AppError> {
    Ok(Json(
        load_report(state.quality_log.as_ref(), query.window, Utc::now()).await,
    ))
}
