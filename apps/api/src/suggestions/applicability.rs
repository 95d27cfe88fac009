//! Which sections get a generator for this candidate, decided before fan-out.
//!
//! Candidate type can force a section on (generate even without existing content) or
//! skip it. A section the user explicitly forces always runs.

use serde::Serialize;

use crate::models::preferences::CandidateType;
use crate::models::resume::StructuredResume;
use crate::suggestions::types::Section;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSection {
    pub section: Section,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionPlan {
    pub applicable: Vec<Section>,
    pub skipped: Vec<SkippedSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Force,
    Skip,
    WhenPresent,
}

fn candidate_rule(candidate_type: CandidateType, section: Section) -> Rule {
    use CandidateType::*;
    use Section::*;

    match (candidate_type, section) {
        (CoopEntry, Summary) => Rule::Skip,
        (CoopEntry, Projects) => Rule::Force,
        (SeniorExecutive, Projects) => Rule::Skip,
        (SeniorExecutive, Summary) => Rule::Force,
        (CareerChanger, Summary) => Rule::Force,
        _ => Rule::WhenPresent,
    }
}

fn has_content(resume: &StructuredResume, section: Section) -> bool {
    match section {
        Section::Summary => resume
            .summary
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty()),
        Section::Skills => !resume.skills.is_empty(),
        Section::Experience => !resume.experience.is_empty(),
        Section::Education => !resume.education.is_empty(),
        Section::Projects => !resume.projects.is_empty(),
    }
}

pub fn plan_sections(
    candidate_type: CandidateType,
    resume: &StructuredResume,
    user_forced: &[Section],
) -> SectionPlan {
    let mut plan = SectionPlan::default();

    for section in Section::ALL {
        if user_forced.contains(&section) {
            plan.applicable.push(section);
            continue;
        }
        match candidate_rule(candidate_type, section) {
            Rule::Force => plan.applicable.push(section),
            Rule::Skip => plan.skipped.push(SkippedSection {
                section,
                reason: format!("not generated for {} candidates", candidate_type.as_str()),
            }),
            Rule::WhenPresent if has_content(resume, section) => plan.applicable.push(section),
            Rule::WhenPresent => plan.skipped.push(SkippedSection {
                section,
                reason: "resume has no content for this section".to_string(),
            }),
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::fixtures::backend_resume;

    #[test]
    fn test_mid_skips_only_empty_sections() {
        let plan = plan_sections(CandidateType::Mid, &backend_resume(), &[]);
        assert_eq!(
            plan.applicable,
            vec![
                Section::Summary,
                Section::Skills,
                Section::Experience,
                Section::Education
            ]
        );
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].section, Section::Projects);
    }

    #[test]
    fn test_coop_skips_summary_and_forces_projects() {
        let plan = plan_sections(CandidateType::CoopEntry, &backend_resume(), &[]);
        assert!(plan.applicable.contains(&Section::Projects));
        assert!(!plan.applicable.contains(&Section::Summary));
    }

    #[test]
    fn test_senior_forces_summary_even_when_missing() {
        let mut resume = backend_resume();
        resume.summary = None;
        let plan = plan_sections(CandidateType::SeniorExecutive, &resume, &[]);
        assert!(plan.applicable.contains(&Section::Summary));
        assert!(plan.skipped.iter().any(|s| s.section == Section::Projects));
    }

    #[test]
    fn test_user_force_overrides_candidate_skip() {
        let plan = plan_sections(CandidateType::CoopEntry, &backend_resume(), &[Section::Summary]);
        assert!(plan.applicable.contains(&Section::Summary));
    }

    #[test]
    fn test_every_section_planned_exactly_once() {
        for ct in CandidateType::ALL {
            let plan = plan_sections(ct, &backend_resume(), &[]);
            assert_eq!(plan.applicable.len() + plan.skipped.len(), Section::ALL.len());
        }
    }
}
