//! Suggestion flow for one request:
//! scan → plan sections → fan out generators → vet concurrently → record metrics.
//!
//! Only the scan can fail the request. Generation failures are per section, judge failures
//! per suggestion, and a metrics write failure is logged and ignored.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::pipeline::{analyze, ScanAnalysis};
use crate::errors::{AppError, ErrorDetail};
use crate::judge::context::SuggestionContext;
use crate::judge::vetting::{skip_vetting, vet_suggestions, UnjudgedPolicy, VettedSuggestion};
use crate::llm_client::LanguageModel;
use crate::metrics::store::{QualityLogStore, QualityMetricLog};
use crate::models::preferences::{CandidateType, OptimizationPreferences};
use crate::models::resume::StructuredResume;
use crate::suggestions::applicability::{plan_sections, SkippedSection};
use crate::suggestions::context::GenerationContext;
use crate::suggestions::generator::LlmSectionGenerator;
use crate::suggestions::orchestrator::{run_generators, SectionOutcome};
use crate::suggestions::types::{Section, Suggestion};

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionRequest {
    pub job_description: String,
    pub resume: StructuredResume,
    #[serde(default)]
    pub candidate_type: CandidateType,
    #[serde(default)]
    pub preferences: OptimizationPreferences,
    #[serde(default)]
    pub force_sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VettingSettings {
    pub judge_enabled: bool,
    pub unjudged_policy: UnjudgedPolicy,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionResult {
    Success { generated: usize },
    Failure { error: ErrorDetail },
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionReport {
    pub analysis: ScanAnalysis,
    pub sections: BTreeMap<Section, SectionResult>,
    pub skipped: Vec<SkippedSection>,
    pub suggestions: Vec<VettedSuggestion>,
    pub withheld: Vec<VettedSuggestion>,
}

pub async fn suggest(
    request: SuggestionRequest,
    llm: Arc<dyn LanguageModel>,
    quality_log: &dyn QualityLogStore,
    settings: VettingSettings,
    now: DateTime<Utc>,
) -> Result<SuggestionReport, AppError> {
    let SuggestionRequest {
        job_description,
        resume,
        candidate_type,
        preferences,
        force_sections,
    } = request;

    let scan = analyze(
        &job_description,
        &resume,
        candidate_type,
        llm.as_ref(),
        now.date_naive(),
    )
    .await?;

    let plan = plan_sections(candidate_type, &resume, &force_sections);
    info!(
        "Generating suggestions for {:?} (skipping {})",
        plan.applicable,
        plan.skipped.len()
    );

    let ctx = Arc::new(GenerationContext::new(resume, &scan, preferences));
    let generators = LlmSectionGenerator::for_sections(&plan.applicable, &llm);
    let outcomes = run_generators(generators, ctx).await;

    let mut sections = BTreeMap::new();
    let mut drafts: Vec<Suggestion> = Vec::new();
    for (section, outcome) in outcomes {
        let result = match outcome {
            SectionOutcome::Success { suggestions } => {
                let generated = suggestions.len();
                drafts.extend(suggestions);
                SectionResult::Success { generated }
            }
            SectionOutcome::Failure { error } => SectionResult::Failure { error },
        };
        sections.insert(section, result);
    }

    let report = if settings.judge_enabled {
        let items = drafts
            .into_iter()
            .map(|s| {
                let ctx = SuggestionContext::new(&s, &job_description, &scan);
                (s, ctx)
            })
            .collect();
        let report = vet_suggestions(Arc::clone(&llm), items, settings.unjudged_policy).await;

        let logs: Vec<QualityMetricLog> = report
            .judged()
            .map(|(s, r)| QualityMetricLog::from_judged(s, r, now))
            .collect();
        if !logs.is_empty() {
            let count = logs.len();
            match quality_log.append(logs).await {
                Ok(()) => info!("Recorded {count} quality metric entries"),
                Err(e) => warn!("Failed to record quality metrics: {e}"),
            }
        }
        report
    } else {
        skip_vetting(drafts)
    };

    Ok(SuggestionReport {
        analysis: scan,
        sections,
        skipped: plan.skipped,
        suggestions: report.approved,
        withheld: report.withheld,
    })
}
