//! Gap Addressability Classifier: decides how honestly each missing keyword could be addressed.
//!
//! - terminology: the resume already shows the concept under different wording
//! - potential: the resume shows adjacent experience that honest elaboration could surface
//! - unfixable: no resume evidence at all; never offered to rewrite prompts
//!
//! Every missing keyword receives exactly one category.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::analysis::keywords::{ExtractedKeyword, KeywordCategory};
use crate::analysis::matcher::ResumeIndex;
use crate::analysis::synonyms::{families_of, soft_skill_evidence};
use crate::analysis::text::{stem, tokenize};
use crate::models::resume::StructuredResume;

/// Jaro-Winkler similarity at which two single tokens are treated as the same term.
const SPELLING_SIMILARITY: f64 = 0.92;
/// Minimum token length for spelling similarity (short tokens collide too easily).
const SPELLING_MIN_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapCategory {
    Terminology,
    Potential,
    Unfixable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedGap {
    pub keyword: ExtractedKeyword,
    pub category: GapCategory,
    /// Resume-side term that justified a terminology/potential classification.
    pub evidence: Option<String>,
}

impl ClassifiedGap {
    pub fn is_addressable(&self) -> bool {
        self.category != GapCategory::Unfixable
    }
}

pub fn classify_gaps(missing: &[ExtractedKeyword], resume: &StructuredResume) -> Vec<ClassifiedGap> {
    let index = ResumeIndex::build(resume);
    classify_against_index(missing, &index)
}

pub fn classify_against_index(
    missing: &[ExtractedKeyword],
    index: &ResumeIndex,
) -> Vec<ClassifiedGap> {
    missing
        .iter()
        .map(|keyword| {
            let (category, evidence) = if let Some(e) = terminology_evidence(keyword, index) {
                (GapCategory::Terminology, Some(e))
            } else if let Some(e) = adjacency_evidence(keyword, index) {
                (GapCategory::Potential, Some(e))
            } else {
                (GapCategory::Unfixable, None)
            };
            ClassifiedGap {
                keyword: keyword.clone(),
                category,
                evidence,
            }
        })
        .collect()
}

/// Same concept, different wording: a near-identical spelling, or most of a
/// multi-word keyword's stems co-occurring in one block.
fn terminology_evidence(keyword: &ExtractedKeyword, index: &ResumeIndex) -> Option<String> {
    let needle = tokenize(&keyword.text);

    if let [single] = needle.as_slice() {
        if single.len() < SPELLING_MIN_LEN {
            return None;
        }
        return index
            .all_tokens()
            .find(|token| {
                token.len() >= SPELLING_MIN_LEN
                    && length_ratio(single, token) >= 0.75
                    && jaro_winkler(single, token) >= SPELLING_SIMILARITY
            })
            .cloned();
    }

    let stems: Vec<String> = needle.iter().map(|t| stem(t)).collect();
    index.blocks.iter().find_map(|block| {
        let hits: Vec<&String> = stems.iter().filter(|s| block.stems.contains(*s)).collect();
        // strictly more than half, and at least two words
        if hits.len() >= 2 && hits.len() * 2 > stems.len() {
            Some(
                hits.iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        } else {
            None
        }
    })
}

/// Adjacent experience: another member of the keyword's skill family, or
/// behavioural evidence for a soft skill.
fn adjacency_evidence(keyword: &ExtractedKeyword, index: &ResumeIndex) -> Option<String> {
    if keyword.category == KeywordCategory::SoftSkills {
        if let Some(verbs) = soft_skill_evidence(&keyword.text) {
            return verbs
                .iter()
                .find(|verb| index.mentions(verb))
                .map(|verb| verb.to_string());
        }
    }

    families_of(&keyword.text)
        .into_iter()
        .flat_map(|(_, members)| members.iter())
        .find(|member| index.mentions(member))
        .map(|member| member.to_string())
}

fn length_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (a.chars().count() as f64, b.chars().count() as f64);
    a.min(b) / a.max(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::Importance;
    use crate::models::resume::fixtures::backend_resume;

    fn kw(text: &str, category: KeywordCategory) -> ExtractedKeyword {
        ExtractedKeyword::new(text, category, Importance::High)
    }

    fn classify_one(text: &str, category: KeywordCategory) -> ClassifiedGap {
        classify_gaps(&[kw(text, category)], &backend_resume()).remove(0)
    }

    #[test]
    fn test_kubernetes_without_devops_is_unfixable() {
        let gap = classify_one("Kubernetes", KeywordCategory::Technologies);
        assert_eq!(gap.category, GapCategory::Unfixable);
        assert!(gap.evidence.is_none());
        assert!(!gap.is_addressable());
    }

    #[test]
    fn test_kubernetes_with_docker_is_potential() {
        let mut resume = backend_resume();
        resume.skills.push("Docker".to_string());
        let gap = classify_gaps(&[kw("Kubernetes", KeywordCategory::Technologies)], &resume).remove(0);
        assert_eq!(gap.category, GapCategory::Potential);
        assert_eq!(gap.evidence.as_deref(), Some("docker"));
    }

    #[test]
    fn test_cloud_family_named_keyword_is_potential() {
        // Resume lists AWS; "cloud platforms" names the cloud family
        let gap = classify_one("cloud platforms", KeywordCategory::Skills);
        assert_eq!(gap.category, GapCategory::Potential);
    }

    #[test]
    fn test_near_spelling_is_terminology() {
        let gap = classify_one("PostgreSQL9", KeywordCategory::Technologies);
        assert_eq!(gap.category, GapCategory::Terminology);
        assert_eq!(gap.evidence.as_deref(), Some("postgresql"));
    }

    #[test]
    fn test_majority_word_overlap_is_terminology() {
        // Resume: "Reduced report latency ..." ; keyword shares "report" and "latency"
        let gap = classify_one("report latency optimization", KeywordCategory::Experience);
        assert_eq!(gap.category, GapCategory::Terminology);
    }

    #[test]
    fn test_soft_skill_with_behavioural_evidence_is_potential() {
        let mut resume = backend_resume();
        resume.experience[0]
            .bullets
            .push("Mentored 3 junior engineers".to_string());
        let gap = classify_gaps(&[kw("Leadership", KeywordCategory::SoftSkills)], &resume).remove(0);
        assert_eq!(gap.category, GapCategory::Potential);
        assert_eq!(gap.evidence.as_deref(), Some("mentored"));
    }

    #[test]
    fn test_soft_skill_without_evidence_is_unfixable() {
        let gap = classify_one("Leadership", KeywordCategory::SoftSkills);
        assert_eq!(gap.category, GapCategory::Unfixable);
    }

    #[test]
    fn test_every_missing_keyword_gets_exactly_one_category() {
        let missing = vec![
            kw("Kubernetes", KeywordCategory::Technologies),
            kw("cloud platforms", KeywordCategory::Skills),
            kw("PostgreSQL9", KeywordCategory::Technologies),
            kw("Fortran", KeywordCategory::Technologies),
            kw("Leadership", KeywordCategory::SoftSkills),
        ];
        let gaps = classify_gaps(&missing, &backend_resume());
        assert_eq!(gaps.len(), missing.len());
        for (gap, keyword) in gaps.iter().zip(&missing) {
            assert_eq!(&gap.keyword, keyword);
        }
    }

    #[test]
    fn test_short_tokens_never_spelling_match() {
        // "Git" vs "Go": both short, must not be called terminology
        let gap = classify_one("Gitlab", KeywordCategory::Technologies);
        assert_ne!(gap.evidence.as_deref(), Some("git"));
    }
}
