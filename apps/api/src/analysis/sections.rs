//! Section completeness: which resume sections are present, weighted by what
//! each candidate type is expected to show.

use serde::{Deserialize, Serialize};

use crate::models::preferences::CandidateType;
use crate::models::resume::StructuredResume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSection {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

const MID_SECTIONS: &[(ResumeSection, f64)] = &[
    (ResumeSection::Contact, 0.15),
    (ResumeSection::Summary, 0.10),
    (ResumeSection::Experience, 0.35),
    (ResumeSection::Education, 0.15),
    (ResumeSection::Skills, 0.20),
    (ResumeSection::Projects, 0.05),
];

const CAREER_CHANGER_SECTIONS: &[(ResumeSection, f64)] = &[
    (ResumeSection::Contact, 0.15),
    (ResumeSection::Summary, 0.20),
    (ResumeSection::Experience, 0.25),
    (ResumeSection::Education, 0.10),
    (ResumeSection::Skills, 0.20),
    (ResumeSection::Projects, 0.10),
];

const COOP_ENTRY_SECTIONS: &[(ResumeSection, f64)] = &[
    (ResumeSection::Contact, 0.15),
    (ResumeSection::Summary, 0.05),
    (ResumeSection::Experience, 0.10),
    (ResumeSection::Education, 0.30),
    (ResumeSection::Skills, 0.20),
    (ResumeSection::Projects, 0.20),
];

const SENIOR_EXECUTIVE_SECTIONS: &[(ResumeSection, f64)] = &[
    (ResumeSection::Contact, 0.15),
    (ResumeSection::Summary, 0.25),
    (ResumeSection::Experience, 0.45),
    (ResumeSection::Education, 0.05),
    (ResumeSection::Skills, 0.10),
];

/// Expected sections and their weight for a candidate type.
pub fn expected_sections(candidate_type: CandidateType) -> &'static [(ResumeSection, f64)] {
    match candidate_type {
        CandidateType::Mid => MID_SECTIONS,
        CandidateType::CareerChanger => CAREER_CHANGER_SECTIONS,
        CandidateType::CoopEntry => COOP_ENTRY_SECTIONS,
        CandidateType::SeniorExecutive => SENIOR_EXECUTIVE_SECTIONS,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSignals {
    pub detected: Vec<ResumeSection>,
    pub missing_expected: Vec<ResumeSection>,
    score: f64,
}

impl SectionSignals {
    pub fn from_resume(resume: &StructuredResume, candidate_type: CandidateType) -> Self {
        let detected = detect_sections(resume);
        Self::from_detected(detected, candidate_type)
    }

    pub fn from_detected(detected: Vec<ResumeSection>, candidate_type: CandidateType) -> Self {
        let expected = expected_sections(candidate_type);
        let total: f64 = expected.iter().map(|(_, w)| w).sum();
        let present: f64 = expected
            .iter()
            .filter(|(s, _)| detected.contains(s))
            .map(|(_, w)| w)
            .sum();
        let missing_expected = expected
            .iter()
            .filter(|(s, _)| !detected.contains(s))
            .map(|(s, _)| *s)
            .collect();

        let score = if total > 0.0 {
            (present / total * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };

        Self {
            detected,
            missing_expected,
            score,
        }
    }

    /// 0–100 weighted presence of expected sections.
    pub fn score(&self) -> f64 {
        self.score
    }
}

pub fn detect_sections(resume: &StructuredResume) -> Vec<ResumeSection> {
    let mut detected = Vec::new();

    let has_contact = resume
        .contact
        .as_ref()
        .is_some_and(|c| c.email.is_some() || c.phone.is_some());
    if has_contact {
        detected.push(ResumeSection::Contact);
    }
    if resume.summary.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        detected.push(ResumeSection::Summary);
    }
    if !resume.experience.is_empty() {
        detected.push(ResumeSection::Experience);
    }
    if !resume.education.is_empty() {
        detected.push(ResumeSection::Education);
    }
    if !resume.skills.is_empty() {
        detected.push(ResumeSection::Skills);
    }
    if !resume.projects.is_empty() {
        detected.push(ResumeSection::Projects);
    }
    if !resume.certifications.is_empty() {
        detected.push(ResumeSection::Certifications);
    }

    detected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::fixtures::backend_resume;

    #[test]
    fn test_section_weights_sum_to_one() {
        for ct in CandidateType::ALL {
            let total: f64 = expected_sections(ct).iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9, "{ct:?} sums to {total}");
        }
    }

    #[test]
    fn test_detect_sections_fixture() {
        let detected = detect_sections(&backend_resume());
        assert!(detected.contains(&ResumeSection::Contact));
        assert!(detected.contains(&ResumeSection::Experience));
        assert!(!detected.contains(&ResumeSection::Projects));
    }

    #[test]
    fn test_mid_candidate_missing_projects() {
        let signals = SectionSignals::from_resume(&backend_resume(), CandidateType::Mid);
        assert_eq!(signals.missing_expected, vec![ResumeSection::Projects]);
        assert!((signals.score() - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_coop_entry_weights_projects_heavily() {
        let mid = SectionSignals::from_resume(&backend_resume(), CandidateType::Mid);
        let coop = SectionSignals::from_resume(&backend_resume(), CandidateType::CoopEntry);
        assert!(coop.score() < mid.score());
    }

    #[test]
    fn test_empty_detection_scores_zero() {
        let signals = SectionSignals::from_detected(vec![], CandidateType::SeniorExecutive);
        assert_eq!(signals.score(), 0.0);
        assert_eq!(signals.missing_expected.len(), 5);
    }
}
