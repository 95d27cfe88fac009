//! Keyword Matcher: pure, deterministic matching of extracted keywords against a resume.
//!
//! For every keyword the whole resume is searched three times, strongest first:
//! 1. exact: the keyword's tokens appear contiguously (case-insensitive)
//! 2. synonym: a known alias of the keyword appears contiguously
//! 3. partial: every keyword token's stem appears within one resume block
//!
//! The first pass that finds the keyword wins; a keyword is either matched or missing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::keywords::ExtractedKeyword;
use crate::analysis::synonyms::aliases_of;
use crate::analysis::text::{contains_phrase, stem, tokenize};
use crate::models::resume::{ResumeLocation, StructuredResume};

/// Tokens shorter than this must match exactly even in the partial pass.
const MIN_STEM_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Synonym,
    Partial,
}

impl MatchType {
    /// Credit a match of this type earns in the keyword sub-score.
    pub fn credit(&self) -> f64 {
        match self {
            MatchType::Exact => 1.0,
            MatchType::Synonym => 0.95,
            MatchType::Partial => 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedKeyword {
    pub keyword: ExtractedKeyword,
    pub match_type: MatchType,
    pub resume_location: ResumeLocation,
    /// The resume-side spelling that produced the match.
    pub matched_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordAnalysisResult {
    pub matched: Vec<MatchedKeyword>,
    pub missing: Vec<ExtractedKeyword>,
    /// round(100 × matched / total); 100 when there are no keywords.
    pub match_percentage: u8,
}

impl KeywordAnalysisResult {
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

/// One tokenized resume block.
#[derive(Debug, Clone)]
pub struct IndexedBlock {
    pub location: ResumeLocation,
    pub tokens: Vec<String>,
    pub stems: HashSet<String>,
}

/// Tokenized view of a resume, built once per request and shared by matcher and gap classifier.
#[derive(Debug, Clone)]
pub struct ResumeIndex {
    pub blocks: Vec<IndexedBlock>,
}

impl ResumeIndex {
    pub fn build(resume: &StructuredResume) -> Self {
        let blocks = resume
            .text_blocks()
            .into_iter()
            .map(|(location, text)| {
                let tokens = tokenize(&text);
                let stems = tokens.iter().map(|t| stem(t)).collect();
                IndexedBlock {
                    location,
                    tokens,
                    stems,
                }
            })
            .collect();
        Self { blocks }
    }

    /// First block containing `phrase` contiguously.
    pub fn find_phrase(&self, phrase: &str) -> Option<ResumeLocation> {
        let needle = tokenize(phrase);
        self.blocks
            .iter()
            .find(|b| contains_phrase(&b.tokens, &needle))
            .map(|b| b.location)
    }

    /// True if any block contains `phrase` contiguously.
    pub fn mentions(&self, phrase: &str) -> bool {
        self.find_phrase(phrase).is_some()
    }

    pub fn all_tokens(&self) -> impl Iterator<Item = &String> {
        self.blocks.iter().flat_map(|b| b.tokens.iter())
    }
}

/// Matches every keyword against the resume. Pure function of its inputs.
pub fn match_keywords(
    keywords: &[ExtractedKeyword],
    resume: &StructuredResume,
) -> KeywordAnalysisResult {
    let index = ResumeIndex::build(resume);
    match_against_index(keywords, &index)
}

pub fn match_against_index(
    keywords: &[ExtractedKeyword],
    index: &ResumeIndex,
) -> KeywordAnalysisResult {
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for keyword in keywords {
        match find_match(keyword, index) {
            Some((match_type, resume_location, matched_text)) => matched.push(MatchedKeyword {
                keyword: keyword.clone(),
                match_type,
                resume_location,
                matched_text,
            }),
            None => missing.push(keyword.clone()),
        }
    }

    let match_percentage = match_percentage(matched.len(), keywords.len());

    KeywordAnalysisResult {
        matched,
        missing,
        match_percentage,
    }
}

pub fn match_percentage(matched: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((matched as f64 / total as f64) * 100.0).round() as u8
}

fn find_match(
    keyword: &ExtractedKeyword,
    index: &ResumeIndex,
) -> Option<(MatchType, ResumeLocation, String)> {
    if let Some(location) = index.find_phrase(&keyword.text) {
        return Some((MatchType::Exact, location, keyword.text.clone()));
    }

    for alias in aliases_of(&keyword.text) {
        if let Some(location) = index.find_phrase(alias) {
            return Some((MatchType::Synonym, location, alias.to_string()));
        }
    }

    let needle = tokenize(&keyword.text);
    if needle.is_empty() {
        return None;
    }
    index
        .blocks
        .iter()
        .find(|block| {
            needle.iter().all(|token| {
                if token.len() < MIN_STEM_LEN {
                    block.tokens.contains(token)
                } else {
                    block.stems.contains(&stem(token))
                }
            })
        })
        .map(|block| (MatchType::Partial, block.location, needle.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::{Importance, KeywordCategory};
    use crate::models::resume::fixtures::backend_resume;

    fn kw(text: &str) -> ExtractedKeyword {
        ExtractedKeyword::new(text, KeywordCategory::Technologies, Importance::High)
    }

    #[test]
    fn test_exact_match_python() {
        let result = match_keywords(&[kw("Python")], &backend_resume());
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].match_type, MatchType::Exact);
        assert!(result.missing.is_empty());
        assert_eq!(result.match_percentage, 100);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let result = match_keywords(&[kw("postgresql")], &backend_resume());
        assert_eq!(result.matched[0].match_type, MatchType::Exact);
    }

    #[test]
    fn test_synonym_match_via_alias() {
        // Resume says "PostgreSQL"; JD says "Postgres"
        let result = match_keywords(&[kw("Postgres")], &backend_resume());
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].match_type, MatchType::Synonym);
        assert_eq!(result.matched[0].matched_text, "postgresql");
    }

    #[test]
    fn test_partial_match_via_stem() {
        // Resume says "query tuning"; JD says "Query tuned"
        let result = match_keywords(&[kw("queries tuned")], &backend_resume());
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].match_type, MatchType::Partial);
    }

    #[test]
    fn test_exact_beats_synonym_and_partial() {
        let result = match_keywords(&[kw("AWS")], &backend_resume());
        assert_eq!(result.matched[0].match_type, MatchType::Exact);
        assert_eq!(result.matched[0].resume_location, ResumeLocation::Skills);
    }

    #[test]
    fn test_missing_keyword() {
        let result = match_keywords(&[kw("Kubernetes"), kw("Python")], &backend_resume());
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing[0].text, "Kubernetes");
        assert_eq!(result.match_percentage, 50);
    }

    #[test]
    fn test_no_keywords_is_full_match() {
        let result = match_keywords(&[], &backend_resume());
        assert_eq!(result.match_percentage, 100);
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_java_does_not_match_javascript() {
        let mut resume = backend_resume();
        resume.skills.push("JavaScript".to_string());
        let result = match_keywords(&[kw("Java")], &resume);
        assert_eq!(result.missing.len(), 1);
    }

    #[test]
    fn test_matched_and_missing_partition_keywords() {
        let keywords = vec![
            kw("Python"),
            kw("Kubernetes"),
            kw("Postgres"),
            kw("Terraform"),
            kw("REST"),
            kw("Git"),
        ];
        let result = match_keywords(&keywords, &backend_resume());

        let matched: HashSet<String> = result.matched.iter().map(|m| m.keyword.key()).collect();
        let missing: HashSet<String> = result.missing.iter().map(|k| k.key()).collect();
        let all: HashSet<String> = keywords.iter().map(|k| k.key()).collect();

        assert!(matched.is_disjoint(&missing));
        assert_eq!(&matched | &missing, all);
        assert_eq!(
            result.match_percentage,
            match_percentage(matched.len(), keywords.len())
        );
    }

    #[test]
    fn test_match_percentage_rounds_and_stays_in_range() {
        assert_eq!(match_percentage(1, 3), 33);
        assert_eq!(match_percentage(2, 3), 67);
        assert_eq!(match_percentage(0, 7), 0);
        assert_eq!(match_percentage(7, 7), 100);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let keywords = vec![kw("Python"), kw("AWS"), kw("Docker")];
        let a = match_keywords(&keywords, &backend_resume());
        let b = match_keywords(&keywords, &backend_resume());
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}
