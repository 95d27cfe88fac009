//! Axum route handlers for the scan API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::analysis::pipeline::{analyze, ScanAnalysis};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::preferences::CandidateType;
use crate::models::resume::StructuredResume;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job_description: String,
    pub resume: StructuredResume,
    #[serde(default)]
    pub candidate_type: CandidateType,
}

/// POST /api/v1/scans/analyze
///
/// Extracts keywords from the JD, matches them against the resume, classifies the gaps
/// and returns the weighted ATS score.
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeRequest>,
) -> Result<Json<ScanAnalysis>, AppError> {
    let scan = analyze(
        &request.job_description,
        &request.resume,
        request.candidate_type,
        state.llm.as_ref(),
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(scan))
}
