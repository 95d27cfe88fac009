//! Keyword Extractor: turns a raw job description into a deduplicated, importance-tiered
//! keyword set via the language-model collaborator.
//!
//! Errors propagate: an empty keyword list is never substituted for a failed call.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::keywords::{dedupe, ExtractedKeyword, Importance};
use crate::analysis::prompts::{extraction_prompt, extraction_system};
use crate::analysis::text::{contains_phrase, sentences, tokenize};
use crate::errors::{AppError, ErrorDetail};
use crate::llm_client::{call_json, LanguageModel, LlmError};

/// Job descriptions shorter than this (after trimming) are rejected as invalid input.
pub const MIN_JD_CHARS: usize = 50;

/// Phrases that mark a clause as a hard requirement.
const REQUIREMENT_MARKERS: &[&str] = &[
    "required",
    "must",
    "minimum",
    "mandatory",
    "essential",
    "you need",
    "at least",
];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("keyword extraction timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("keyword extraction returned an unexpected shape: {0}")]
    Schema(String),

    #[error("keyword extraction failed: {0}")]
    Llm(String),
}

impl From<LlmError> for ExtractionError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout { secs } => ExtractionError::Timeout { secs },
            e if e.is_schema_mismatch() => ExtractionError::Schema(e.to_string()),
            e => ExtractionError::Llm(e.to_string()),
        }
    }
}

impl ExtractionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExtractionError::Timeout { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::Timeout { .. } => "EXTRACTION_TIMEOUT",
            ExtractionError::Schema(_) => "EXTRACTION_SCHEMA_MISMATCH",
            ExtractionError::Llm(_) => "EXTRACTION_FAILED",
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Everything extraction learns about the role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequirements {
    pub keywords: Vec<ExtractedKeyword>,
    #[serde(default)]
    pub minimum_years_experience: Option<f64>,
}

/// Wire shape of the model's reply. Enums are closed, so an unknown category fails parsing.
#[derive(Debug, Deserialize)]
struct ExtractionReply {
    keywords: Vec<ExtractedKeyword>,
    #[serde(default)]
    minimum_years_experience: Option<f64>,
}

/// Trims and length-checks the job description.
pub fn validate_job_description(jd_text: &str) -> Result<&str, AppError> {
    let trimmed = jd_text.trim();
    let chars = trimmed.chars().count();
    if chars < MIN_JD_CHARS {
        return Err(AppError::Validation(format!(
            "job description must be at least {MIN_JD_CHARS} characters (got {chars})"
        )));
    }
    Ok(trimmed)
}

/// Extracts keywords from an already-validated job description.
pub async fn extract_keywords(
    jd_text: &str,
    llm: &dyn LanguageModel,
) -> Result<JobRequirements, ExtractionError> {
    let prompt = extraction_prompt(jd_text);
    let reply: ExtractionReply = call_json(llm, &prompt, &extraction_system()).await?;

    let minimum_years_experience = reply
        .minimum_years_experience
        .filter(|y| y.is_finite() && *y >= 0.0);

    let mut keywords = dedupe(reply.keywords);
    reconcile_importance(&mut keywords, jd_text);

    info!(
        "Extracted {} keywords ({} high importance)",
        keywords.len(),
        keywords
            .iter()
            .filter(|k| k.importance == Importance::High)
            .count()
    );

    Ok(JobRequirements {
        keywords,
        minimum_years_experience,
    })
}

/// Raises any keyword mentioned in a requirement-marked clause to `high`.
/// Importance is only ever raised, never lowered.
pub fn reconcile_importance(keywords: &mut [ExtractedKeyword], jd_text: &str) {
    let markers: Vec<Vec<String>> = REQUIREMENT_MARKERS.iter().map(|m| tokenize(m)).collect();

    let required_clauses: Vec<Vec<String>> = sentences(jd_text)
        .map(tokenize)
        .filter(|tokens| markers.iter().any(|m| contains_phrase(tokens, m)))
        .collect();

    for kw in keywords.iter_mut() {
        if kw.importance == Importance::High {
            continue;
        }
        let needle = tokenize(&kw.text);
        if required_clauses
            .iter()
            .any(|clause| contains_phrase(clause, &needle))
        {
            debug!("Raising '{}' to high importance (requirement marker)", kw.text);
            kw.importance = Importance::High;
        }
    }
}
