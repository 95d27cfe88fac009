//! What the judge sees for one suggestion.

use serde::Serialize;
use uuid::Uuid;

use crate::analysis::gaps::GapCategory;
use crate::analysis::pipeline::ScanAnalysis;
use crate::suggestions::types::{Section, Suggestion};

/// Character budget for the job-description excerpt given to the judge.
pub const JD_EXCERPT_BUDGET: usize = 1500;

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionContext {
    pub suggestion_id: Uuid,
    pub section: Section,
    pub original_text: String,
    pub suggested_text: String,
    pub jd_excerpt: String,
    pub matched_keywords: Vec<String>,
    /// Missing keywords the resume could honestly address.
    pub addressable_keywords: Vec<String>,
    /// Missing keywords with no resume evidence; a suggestion claiming them is fabricating.
    pub unsupported_keywords: Vec<String>,
    pub ats_score: u8,
}

impl SuggestionContext {
    pub fn new(suggestion: &Suggestion, jd_text: &str, scan: &ScanAnalysis) -> Self {
        let (unsupported, addressable): (Vec<_>, Vec<_>) = scan
            .gaps
            .iter()
            .partition(|g| g.category == GapCategory::Unfixable);

        Self {
            suggestion_id: suggestion.id,
            section: suggestion.section,
            original_text: suggestion.original_text.clone(),
            suggested_text: suggestion.suggested_text.clone(),
            jd_excerpt: truncate_to_sentence(jd_text, JD_EXCERPT_BUDGET),
            matched_keywords: scan
                .keyword_analysis
                .matched
                .iter()
                .map(|m| m.keyword.text.clone())
                .collect(),
            addressable_keywords: addressable.iter().map(|g| g.keyword.text.clone()).collect(),
            unsupported_keywords: unsupported.iter().map(|g| g.keyword.text.clone()).collect(),
            ats_score: scan.score.overall,
        }
    }
}

/// Cuts `text` to at most `budget` characters, preferring the last sentence end that keeps
/// at least half the budget, then the last word boundary.
pub fn truncate_to_sentence(text: &str, budget: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(budget)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let prefix = &text[..cut];
    let half = text
        .char_indices()
        .nth(budget / 2)
        .map(|(i, _)| i)
        .unwrap_or(0);

    if let Some(end) = prefix.rfind(['.', '!', '?', '\n']).filter(|&i| i >= half) {
        return prefix[..=end].trim_end().to_string();
    }
    if let Some(space) = prefix.rfind(char::is_whitespace) {
        return prefix[..space].trim_end().to_string();
    }
    prefix.to_string()
}
