//! Deterministic scan path: extract → match → classify → score.
//!
//! Stages run strictly in order and any error aborts the scan; there is no partial
//! analysis result. Only extraction touches the language model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::extractor::{extract_keywords, validate_job_description, JobRequirements};
use crate::analysis::gaps::{classify_against_index, ClassifiedGap, GapCategory};
use crate::analysis::matcher::{match_against_index, KeywordAnalysisResult, ResumeIndex};
use crate::analysis::quality::ContentQualitySignals;
use crate::analysis::scoring::{
    calculate_ats_score, AtsScore, FormatSignals, QualificationInputs, ScoreInputs,
};
use crate::analysis::sections::SectionSignals;
use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use crate::models::preferences::CandidateType;
use crate::models::resume::StructuredResume;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanAnalysis {
    pub candidate_type: CandidateType,
    pub requirements: JobRequirements,
    pub keyword_analysis: KeywordAnalysisResult,
    pub gaps: Vec<ClassifiedGap>,
    pub score: AtsScore,
    pub content_quality: ContentQualitySignals,
    pub sections: SectionSignals,
}

/// Runs the full scan for one job description / resume pair.
pub async fn analyze(
    jd_text: &str,
    resume: &StructuredResume,
    candidate_type: CandidateType,
    llm: &dyn LanguageModel,
    today: NaiveDate,
) -> Result<ScanAnalysis, AppError> {
    let jd_text = validate_job_description(jd_text)?;
    resume.validate()?;

    let requirements = extract_keywords(jd_text, llm).await?;
    score_requirements(requirements, resume, candidate_type, today)
}

/// Everything after extraction. Pure given its inputs.
pub fn score_requirements(
    requirements: JobRequirements,
    resume: &StructuredResume,
    candidate_type: CandidateType,
    today: NaiveDate,
) -> Result<ScanAnalysis, AppError> {
    let index = ResumeIndex::build(resume);

    let keyword_analysis = match_against_index(&requirements.keywords, &index);
    let gaps = classify_against_index(&keyword_analysis.missing, &index);

    let qualifications = QualificationInputs::from_analysis(
        &keyword_analysis,
        requirements.minimum_years_experience,
        resume,
        today,
    );
    let content_quality = ContentQualitySignals::from_resume(resume);
    let sections = SectionSignals::from_resume(resume, candidate_type);
    let format = FormatSignals::from_resume(resume);

    let score = calculate_ats_score(&ScoreInputs {
        keyword_analysis: &keyword_analysis,
        qualifications: &qualifications,
        content: &content_quality,
        sections: &sections,
        format: &format,
        candidate_type,
    })?;

    info!(
        "Scan complete: {}/{} keywords matched, {} unfixable gaps, overall score {}",
        keyword_analysis.matched.len(),
        keyword_analysis.total(),
        gaps.iter()
            .filter(|g| g.category == GapCategory::Unfixable)
            .count(),
        score.overall
    );

    Ok(ScanAnalysis {
        candidate_type,
        requirements,
        keyword_analysis,
        gaps,
        score,
        content_quality,
        sections,
    })
}
