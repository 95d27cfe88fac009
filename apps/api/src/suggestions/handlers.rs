//! Axum route handlers for the suggestion API.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::suggestions::service::{suggest, SuggestionReport, SuggestionRequest, VettingSettings};

/// POST /api/v1/scans/suggestions
///
/// Scans the resume, generates suggestions for every applicable section concurrently,
/// vets them with the judge and records one quality metric per judged suggestion.
/// A failing section or judge call is reported inline; only a failed scan errors.
pub async fn handle_suggestions(
    State(state): State<AppState>,
    AppJson(request): AppJson<SuggestionRequest>,
) -> Result<Json<SuggestionReport>, AppError> {
    let settings = VettingSettings {
        judge_enabled: state.config.judge_enabled,
        unjudged_policy: state.config.unjudged_policy,
    };

    let report = suggest(
        request,
        Arc::clone(&state.llm),
        state.quality_log.as_ref(),
        settings,
        Utc::now(),
    )
    .await?;

    Ok(Json(report))
}
