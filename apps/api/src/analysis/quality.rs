//! Content quality signals: bullet quantification and vague-language checks.

use serde::{Deserialize, Serialize};

use crate::models::resume::StructuredResume;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletIssue {
    pub reason: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletCheck {
    pub quantified: bool,
    pub vague: bool,
    pub issues: Vec<BulletIssue>,
}

/// Aggregate content signals over all achievement bullets of a resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentQualitySignals {
    pub bullet_count: usize,
    pub quantified_bullets: usize,
    pub vague_bullets: usize,
    /// Bullets that fail quantification; the experience and project prompts list them first.
    pub unquantified_examples: Vec<String>,
}

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
    "responsible for",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "many",
    "numerous",
    "various",
    "several",
];

/// Share of the content sub-score earned by quantification; the rest by avoiding vague language.
const QUANTIFIED_SHARE: f64 = 70.0;
const PRECISION_SHARE: f64 = 30.0;
const MAX_UNQUANTIFIED_EXAMPLES: usize = 5;

/// Checks a single bullet for quantified impact and vague phrasing.
///
/// Quantified: contains a digit, `%`, or a currency symbol.
/// Vague: uses a vague verb, or a vague scale word without a number.
pub fn check_bullet(text: &str) -> BulletCheck {
    let text_lower = text.to_lowercase();

    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains('$') || text.contains('€') || text.contains('£');
    let quantified = has_digit || has_percent || has_currency;

    let mut issues = Vec::new();

    let vague_verb = VAGUE_VERBS.iter().find(|v| text_lower.contains(*v));
    if let Some(verb) = vague_verb {
        issues.push(BulletIssue {
            reason: format!("Contains vague verb '{verb}'"),
            suggestion: format!("Replace '{verb}' with the concrete action you took"),
        });
    }

    let vague_scale = if quantified {
        None
    } else {
        VAGUE_SCALE_WORDS.iter().find(|w| text_lower.contains(*w))
    };
    if let Some(word) = vague_scale {
        issues.push(BulletIssue {
            reason: format!("Uses vague scale word '{word}' without a number"),
            suggestion: format!("Replace '{word}' with a specific number or percentage"),
        });
    }

    if !quantified {
        issues.push(BulletIssue {
            reason: "No quantified outcome found".to_string(),
            suggestion: "Add a number, percentage, time saved, or scale if the work supports it"
                .to_string(),
        });
    }

    BulletCheck {
        quantified,
        vague: vague_verb.is_some() || vague_scale.is_some(),
        issues,
    }
}

impl ContentQualitySignals {
    pub fn from_resume(resume: &StructuredResume) -> Self {
        let mut signals = ContentQualitySignals::default();

        for bullet in resume.achievement_bullets() {
            let check = check_bullet(bullet);
            signals.bullet_count += 1;
            if check.quantified {
                signals.quantified_bullets += 1;
            } else if signals.unquantified_examples.len() < MAX_UNQUANTIFIED_EXAMPLES {
                signals.unquantified_examples.push(bullet.to_string());
            }
            if check.vague {
                signals.vague_bullets += 1;
            }
        }

        signals
    }

    /// 0–100. A resume with no achievement bullets scores 0.
    pub fn score(&self) -> f64 {
        if self.bullet_count == 0 {
            return 0.0;
        }
        let n = self.bullet_count as f64;
        let quantified_ratio = self.quantified_bullets as f64 / n;
        let precise_ratio = 1.0 - self.vague_bullets as f64 / n;
        (quantified_ratio * QUANTIFIED_SHARE + precise_ratio * PRECISION_SHARE).clamp(0.0, 100.0)
    }
}
