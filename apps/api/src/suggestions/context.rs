//! Shared, read-only input for every section generator in one request.
//!
//! Unfixable gaps are kept only for the fabrication guard; `render_for_prompt` never emits them.

use serde::Serialize;

use crate::analysis::gaps::{ClassifiedGap, GapCategory};
use crate::analysis::pipeline::ScanAnalysis;
use crate::analysis::text::{contains_phrase, tokenize};
use crate::models::preferences::{CandidateType, OptimizationPreferences};
use crate::models::resume::StructuredResume;

#[derive(Debug, Clone, Serialize)]
pub struct AddressableGap {
    pub keyword: String,
    pub category: GapCategory,
    pub evidence: Option<String>,
}

/// Keyword context after gap-addressability filtering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordContext {
    pub matched: Vec<String>,
    pub addressable: Vec<AddressableGap>,
    #[serde(skip)]
    unfixable: Vec<String>,
}

impl KeywordContext {
    pub fn from_analysis(scan: &ScanAnalysis) -> Self {
        let matched = scan
            .keyword_analysis
            .matched
            .iter()
            .map(|m| m.keyword.text.clone())
            .collect();
        Self::from_gaps(matched, &scan.gaps)
    }

    pub fn from_gaps(matched: Vec<String>, gaps: &[ClassifiedGap]) -> Self {
        let (addressable, unfixable): (Vec<_>, Vec<_>) =
            gaps.iter().partition(|g| g.is_addressable());

        Self {
            matched,
            addressable: addressable
                .into_iter()
                .map(|g| AddressableGap {
                    keyword: g.keyword.text.clone(),
                    category: g.category,
                    evidence: g.evidence.clone(),
                })
                .collect(),
            unfixable: unfixable
                .into_iter()
                .map(|g| g.keyword.text.clone())
                .collect(),
        }
    }

    pub fn unfixable(&self) -> &[String] {
        &self.unfixable
    }

    /// Unfixable keywords that `suggested` mentions but `original` does not.
    pub fn introduced_unfixable(&self, original: &str, suggested: &str) -> Vec<&str> {
        let original = tokenize(original);
        let suggested = tokenize(suggested);
        self.unfixable
            .iter()
            .filter(|kw| {
                let needle = tokenize(kw);
                contains_phrase(&suggested, &needle) && !contains_phrase(&original, &needle)
            })
            .map(String::as_str)
            .collect()
    }

    pub fn render_for_prompt(&self) -> String {
        let mut out = String::new();

        out.push_str("Keywords the resume already covers:\n");
        if self.matched.is_empty() {
            out.push_str("- (none)\n");
        }
        for kw in &self.matched {
            out.push_str(&format!("- {kw}\n"));
        }

        out.push_str("\nKeywords the resume could honestly address:\n");
        if self.addressable.is_empty() {
            out.push_str("- (none)\n");
        }
        for gap in &self.addressable {
            let how = match gap.category {
                GapCategory::Terminology => "already shown under different wording",
                _ => "adjacent experience exists",
            };
            match &gap.evidence {
                Some(evidence) => out.push_str(&format!(
                    "- {} ({how}; resume evidence: \"{evidence}\")\n",
                    gap.keyword
                )),
                None => out.push_str(&format!("- {} ({how})\n", gap.keyword)),
            }
        }

        out
    }
}

#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub resume: StructuredResume,
    pub keywords: KeywordContext,
    pub preferences: OptimizationPreferences,
    pub candidate_type: CandidateType,
    pub ats_score: u8,
    /// Bullets with no measurable impact, from the content-quality scan.
    pub unquantified_bullets: Vec<String>,
}

impl GenerationContext {
    pub fn new(
        resume: StructuredResume,
        scan: &ScanAnalysis,
        preferences: OptimizationPreferences,
    ) -> Self {
        Self {
            resume,
            keywords: KeywordContext::from_analysis(scan),
            preferences,
            candidate_type: scan.candidate_type,
            ats_score: scan.score.overall,
            unquantified_bullets: scan.content_quality.unquantified_examples.clone(),
        }
    }
}
