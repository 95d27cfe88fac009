//! ATS Score Calculator: five independently scored dimensions combined through a
//! candidate-type weight profile.
//!
//! Sub-scores keep full `f64` precision; only the overall score is rounded.
//! Every weight profile must sum to 1.0 (checked by tests and once at startup).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::keywords::ExtractedKeyword;
use crate::analysis::matcher::KeywordAnalysisResult;
use crate::analysis::quality::ContentQualitySignals;
use crate::analysis::sections::SectionSignals;
use crate::models::preferences::CandidateType;
use crate::models::resume::StructuredResume;

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-5;

/// Qualification sub-score used when neither requirements nor years are known.
pub const NEUTRAL_QUALIFICATION_SCORE: f64 = 50.0;

const OVERLONG_BULLET_CHARS: usize = 250;
const SHORT_BULLET_AVG_CHARS: f64 = 30.0;
const LONG_BULLET_AVG_CHARS: f64 = 220.0;

#[derive(Debug, Error, PartialEq)]
pub enum ComputationError {
    #[error("weight profile '{profile}' sums to {total}, expected 1.0")]
    WeightSum { profile: &'static str, total: f64 },

    #[error("weight profile '{profile}' has {dimension} weight {weight} outside [0, 1]")]
    WeightOutOfRange {
        profile: &'static str,
        dimension: &'static str,
        weight: f64,
    },

    #[error("{dimension} sub-score {value} is outside [0, 100]")]
    SubScoreOutOfRange { dimension: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub candidate_type: CandidateType,
    pub keywords: f64,
    pub qualification_fit: f64,
    pub content_quality: f64,
    pub sections: f64,
    pub format: f64,
}

pub const CAREER_CHANGER: WeightProfile = WeightProfile {
    candidate_type: CandidateType::CareerChanger,
    keywords: 0.40,
    qualification_fit: 0.14,
    content_quality: 0.18,
    sections: 0.18,
    format: 0.10,
};

pub const COOP_ENTRY: WeightProfile = WeightProfile {
    candidate_type: CandidateType::CoopEntry,
    keywords: 0.35,
    qualification_fit: 0.10,
    content_quality: 0.20,
    sections: 0.25,
    format: 0.10,
};

pub const MID: WeightProfile = WeightProfile {
    candidate_type: CandidateType::Mid,
    keywords: 0.40,
    qualification_fit: 0.20,
    content_quality: 0.20,
    sections: 0.10,
    format: 0.10,
};

pub const SENIOR_EXECUTIVE: WeightProfile = WeightProfile {
    candidate_type: CandidateType::SeniorExecutive,
    keywords: 0.30,
    qualification_fit: 0.30,
    content_quality: 0.25,
    sections: 0.05,
    format: 0.10,
};

pub const WEIGHT_PROFILES: [WeightProfile; 4] = [CAREER_CHANGER, COOP_ENTRY, MID, SENIOR_EXECUTIVE];

pub fn weight_profile(candidate_type: CandidateType) -> &'static WeightProfile {
    match candidate_type {
        CandidateType::CareerChanger => &CAREER_CHANGER,
        CandidateType::CoopEntry => &COOP_ENTRY,
        CandidateType::Mid => &MID,
        CandidateType::SeniorExecutive => &SENIOR_EXECUTIVE,
    }
}

impl WeightProfile {
    fn dimensions(&self) -> [(&'static str, f64); 5] {
        [
            ("keywords", self.keywords),
            ("qualification_fit", self.qualification_fit),
            ("content_quality", self.content_quality),
            ("sections", self.sections),
            ("format", self.format),
        ]
    }

    pub fn total(&self) -> f64 {
        self.dimensions().iter().map(|(_, w)| w).sum()
    }

    pub fn validate(&self) -> Result<(), ComputationError> {
        let profile = self.candidate_type.as_str();
        for (dimension, weight) in self.dimensions() {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ComputationError::WeightOutOfRange {
                    profile,
                    dimension,
                    weight,
                });
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ComputationError::WeightSum { profile, total });
        }
        Ok(())
    }

    /// Weighted sum of the breakdown, unrounded.
    pub fn combine(&self, b: &ScoreBreakdown) -> f64 {
        b.keywords * self.keywords
            + b.qualification_fit * self.qualification_fit
            + b.content_quality * self.content_quality
            + b.sections * self.sections
            + b.format * self.format
    }
}

/// Validates every built-in profile. Called at startup; a failure is fatal.
pub fn validate_weight_profiles() -> Result<(), ComputationError> {
    WEIGHT_PROFILES.iter().try_for_each(WeightProfile::validate)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keywords: f64,
    pub qualification_fit: f64,
    pub content_quality: f64,
    pub sections: f64,
    pub format: f64,
}

impl ScoreBreakdown {
    fn validate(&self) -> Result<(), ComputationError> {
        let dims = [
            ("keywords", self.keywords),
            ("qualification_fit", self.qualification_fit),
            ("content_quality", self.content_quality),
            ("sections", self.sections),
            ("format", self.format),
        ];
        for (dimension, value) in dims {
            if !(0.0..=100.0).contains(&value) {
                return Err(ComputationError::SubScoreOutOfRange { dimension, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsScore {
    /// 0–100, rounded once from the weighted sum.
    pub overall: u8,
    pub breakdown: ScoreBreakdown,
    pub weight_profile: WeightProfile,
}

/// Qualification-fit inputs: JD qualification keywords and their match state,
/// plus optional minimum-years requirement vs years on the resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualificationInputs {
    pub requirements: Vec<(ExtractedKeyword, bool)>,
    pub minimum_years: Option<f64>,
    pub candidate_years: Option<f64>,
}

impl QualificationInputs {
    pub fn from_analysis(
        analysis: &KeywordAnalysisResult,
        minimum_years: Option<f64>,
        resume: &StructuredResume,
        today: NaiveDate,
    ) -> Self {
        let requirements = analysis
            .matched
            .iter()
            .map(|m| (m.keyword.clone(), true))
            .chain(analysis.missing.iter().map(|k| (k.clone(), false)))
            .filter(|(k, _)| k.category.is_qualification())
            .collect();

        Self {
            requirements,
            minimum_years,
            candidate_years: resume.experience_years(today),
        }
    }
}

/// Format signals read straight off the structured resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatSignals {
    pub has_email: bool,
    pub has_phone: bool,
    pub bullet_count: usize,
    pub average_bullet_chars: f64,
    pub overlong_bullets: usize,
    pub undated_experience: usize,
}

impl FormatSignals {
    pub fn from_resume(resume: &StructuredResume) -> Self {
        let contact = resume.contact.as_ref();
        let bullets = resume.achievement_bullets();
        let lengths: Vec<usize> = bullets.iter().map(|b| b.chars().count()).collect();
        let average_bullet_chars = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
        };

        Self {
            has_email: contact.is_some_and(|c| c.email.is_some()),
            has_phone: contact.is_some_and(|c| c.phone.is_some()),
            bullet_count: bullets.len(),
            average_bullet_chars,
            overlong_bullets: lengths.iter().filter(|&&l| l > OVERLONG_BULLET_CHARS).count(),
            undated_experience: resume
                .experience
                .iter()
                .filter(|e| e.start_date.is_none())
                .count(),
        }
    }
}

/// Everything the calculator needs for one request.
#[derive(Debug, Clone)]
pub struct ScoreInputs<'a> {
    pub keyword_analysis: &'a KeywordAnalysisResult,
    pub qualifications: &'a QualificationInputs,
    pub content: &'a ContentQualitySignals,
    pub sections: &'a SectionSignals,
    pub format: &'a FormatSignals,
    pub candidate_type: CandidateType,
}

pub fn calculate_ats_score(inputs: &ScoreInputs<'_>) -> Result<AtsScore, ComputationError> {
    let breakdown = ScoreBreakdown {
        keywords: keyword_sub_score(inputs.keyword_analysis),
        qualification_fit: qualification_sub_score(inputs.qualifications),
        content_quality: inputs.content.score(),
        sections: inputs.sections.score(),
        format: format_sub_score(inputs.format),
    };
    score_from_breakdown(breakdown, weight_profile(inputs.candidate_type))
}

/// Combines a breakdown under a profile. Rounds exactly once.
pub fn score_from_breakdown(
    breakdown: ScoreBreakdown,
    profile: &WeightProfile,
) -> Result<AtsScore, ComputationError> {
    profile.validate()?;
    breakdown.validate()?;

    let overall = profile.combine(&breakdown).round().clamp(0.0, 100.0) as u8;

    Ok(AtsScore {
        overall,
        breakdown,
        weight_profile: *profile,
    })
}

/// Importance-weighted keyword coverage. High-importance misses cost three times a low one;
/// weaker match types earn partial credit. No keywords → 100.
pub fn keyword_sub_score(analysis: &KeywordAnalysisResult) -> f64 {
    let total_weight: f64 = analysis
        .matched
        .iter()
        .map(|m| m.keyword.importance.weight())
        .chain(analysis.missing.iter().map(|k| k.importance.weight()))
        .sum();

    if total_weight == 0.0 {
        return 100.0;
    }

    let earned: f64 = analysis
        .matched
        .iter()
        .map(|m| m.keyword.importance.weight() * m.match_type.credit())
        .sum();

    (earned / total_weight * 100.0).clamp(0.0, 100.0)
}

/// Average of requirement coverage and years coverage, whichever are known.
/// Neither known → neutral midpoint.
pub fn qualification_sub_score(inputs: &QualificationInputs) -> f64 {
    let mut parts = Vec::with_capacity(2);

    if !inputs.requirements.is_empty() {
        let total: f64 = inputs
            .requirements
            .iter()
            .map(|(k, _)| k.importance.weight())
            .sum();
        let met: f64 = inputs
            .requirements
            .iter()
            .filter(|(_, satisfied)| *satisfied)
            .map(|(k, _)| k.importance.weight())
            .sum();
        parts.push(met / total * 100.0);
    }

    if let (Some(required), Some(actual)) = (inputs.minimum_years, inputs.candidate_years) {
        let ratio = if required <= 0.0 {
            1.0
        } else {
            (actual / required).min(1.0)
        };
        parts.push(ratio * 100.0);
    }

    if parts.is_empty() {
        return NEUTRAL_QUALIFICATION_SCORE;
    }
    (parts.iter().sum::<f64>() / parts.len() as f64).clamp(0.0, 100.0)
}

/// Deduction-based format heuristic starting from 100.
pub fn format_sub_score(signals: &FormatSignals) -> f64 {
    let mut score = 100.0_f64;

    if !signals.has_email {
        score -= 15.0;
    }
    if !signals.has_phone {
        score -= 10.0;
    }
    if signals.bullet_count == 0 {
        score -= 20.0;
    } else if signals.average_bullet_chars < SHORT_BULLET_AVG_CHARS
        || signals.average_bullet_chars > LONG_BULLET_AVG_CHARS
    {
        score -= 10.0;
    }
    score -= (signals.overlong_bullets as f64 * 5.0).min(20.0);
    score -= (signals.undated_experience as f64 * 5.0).min(15.0);

    score.clamp(0.0, 100.0)
}
