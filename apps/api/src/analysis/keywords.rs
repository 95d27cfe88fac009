//! Keyword data model shared by extraction, matching, gap classification and scoring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Skills,
    Technologies,
    Qualifications,
    Experience,
    SoftSkills,
    Certifications,
}

impl KeywordCategory {
    /// Categories that describe what the candidate must *have* rather than what they can *do*.
    pub fn is_qualification(&self) -> bool {
        matches!(
            self,
            KeywordCategory::Qualifications
                | KeywordCategory::Certifications
                | KeywordCategory::Experience
        )
    }
}

/// Ordered so that `max()` picks the more important tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    /// Relative weight of a keyword of this tier in importance-weighted sums.
    pub fn weight(&self) -> f64 {
        match self {
            Importance::High => 3.0,
            Importance::Medium => 2.0,
            Importance::Low => 1.0,
        }
    }
}

/// A single requirement/keyword derived from a job description. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedKeyword {
    pub text: String,
    pub category: KeywordCategory,
    pub importance: Importance,
}

impl ExtractedKeyword {
    pub fn new(text: &str, category: KeywordCategory, importance: Importance) -> Self {
        Self {
            text: text.to_string(),
            category,
            importance,
        }
    }

    /// Identity key: case-insensitive, whitespace-collapsed.
    pub fn key(&self) -> String {
        normalize(&self.text)
    }
}

pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Deduplicates by normalized text, keeping first-seen order and category.
/// When duplicates disagree on importance the higher tier wins.
pub fn dedupe(keywords: Vec<ExtractedKeyword>) -> Vec<ExtractedKeyword> {
    let mut out: Vec<ExtractedKeyword> = Vec::with_capacity(keywords.len());

    for mut kw in keywords {
        let key = kw.key();
        if key.is_empty() {
            continue;
        }
        match out.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => existing.importance = existing.importance.max(kw.importance),
            None => {
                kw.text = kw.text.split_whitespace().collect::<Vec<_>>().join(" ");
                out.push(kw);
            }
        }
    }

    out
}
