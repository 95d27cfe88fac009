//! Tone calibration: maps user preferences to verb sets and length/edit guidance.
//!
//! Entry-level and co-op candidates never get sole-owner verbs, whatever tone is requested.

use crate::models::preferences::{
    CandidateType, Emphasis, ExperienceLevel, ModificationLevel, OptimizationPreferences, Tone,
    Verbosity,
};

/// Verb sets and phrasing guidance calibrated to one request's preferences.
#[derive(Debug, Clone)]
pub struct ToneGuidance {
    pub strong_verbs: Vec<&'static str>,
    pub avoid_verbs: Vec<&'static str>,
    pub length_hint: &'static str,
    pub edit_hint: &'static str,
    pub emphasis_hint: &'static str,
}

/// Verbs that signal sole-author ownership.
const SOLE_OWNER_VERBS: &[&str] = &[
    "Architected",
    "Spearheaded",
    "Owned",
    "Drove",
    "Led",
    "Directed",
];

fn verbs_for_tone(tone: Tone) -> (Vec<&'static str>, Vec<&'static str>) {
    match tone {
        Tone::Professional => (
            vec!["Delivered", "Implemented", "Developed", "Improved", "Coordinated", "Led"],
            vec!["crushed", "rockstar", "ninja"],
        ),
        Tone::Confident => (
            vec!["Architected", "Spearheaded", "Drove", "Owned", "Launched", "Built"],
            vec!["assisted", "helped", "participated in", "was involved in"],
        ),
        Tone::Conversational => (
            vec!["Built", "Shipped", "Worked with", "Set up", "Made", "Improved"],
            vec!["leveraged", "synergized", "utilized"],
        ),
        Tone::Technical => (
            vec!["Designed", "Optimized", "Profiled", "Benchmarked", "Migrated", "Automated"],
            vec!["passionate", "dynamic", "go-getter"],
        ),
    }
}

/// Drops sole-owner verbs for candidates early in their career.
pub fn filter_verbs_for_level<'a>(
    verbs: &[&'a str],
    level: ExperienceLevel,
    candidate_type: CandidateType,
) -> Vec<&'a str> {
    let junior = matches!(level, ExperienceLevel::Entry) || candidate_type == CandidateType::CoopEntry;
    if !junior {
        return verbs.to_vec();
    }
    verbs
        .iter()
        .filter(|&&v| !SOLE_OWNER_VERBS.iter().any(|&sv| sv.eq_ignore_ascii_case(v)))
        .copied()
        .collect()
}

pub fn tone_guidance(prefs: &OptimizationPreferences, candidate_type: CandidateType) -> ToneGuidance {
    let (strong, avoid) = verbs_for_tone(prefs.tone);

    ToneGuidance {
        strong_verbs: filter_verbs_for_level(&strong, prefs.experience_level, candidate_type),
        avoid_verbs: avoid,
        length_hint: match prefs.verbosity {
            Verbosity::Concise => "Keep each item to one short line (under 120 characters).",
            Verbosity::Balanced => "Keep each item to one or two lines (under 200 characters).",
            Verbosity::Detailed => "Items may run to two full lines when the detail is real.",
        },
        edit_hint: match prefs.modification_level {
            ModificationLevel::Conservative => {
                "Change as little as possible: swap wording, keep structure and facts."
            }
            ModificationLevel::Moderate => {
                "Rephrase freely, but keep every fact and its scope intact."
            }
            ModificationLevel::Aggressive => {
                "Restructure completely if it helps, still using only facts from the resume."
            }
        },
        emphasis_hint: match prefs.emphasis {
            Emphasis::Keywords => "Prioritize working the listed keywords in naturally.",
            Emphasis::Impact => "Prioritize measurable outcomes already present in the resume.",
            Emphasis::Skills => "Prioritize the technical skills the resume demonstrates.",
            Emphasis::Leadership => "Prioritize collaboration, mentoring and ownership the resume shows.",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confident_tone_includes_ownership_verbs() {
        let prefs = OptimizationPreferences {
            tone: Tone::Confident,
            ..Default::default()
        };
        let g = tone_guidance(&prefs, CandidateType::Mid);
        assert!(g.strong_verbs.contains(&"Architected"));
        assert!(g.avoid_verbs.contains(&"helped"));
    }

    #[test]
    fn test_coop_candidate_never_gets_sole_owner_verbs() {
        let prefs = OptimizationPreferences {
            tone: Tone::Confident,
            ..Default::default()
        };
        let g = tone_guidance(&prefs, CandidateType::CoopEntry);
        assert!(!g.strong_verbs.contains(&"Architected"));
        assert!(!g.strong_verbs.contains(&"Spearheaded"));
        assert!(g.strong_verbs.contains(&"Launched"));
    }

    #[test]
    fn test_entry_level_filters_even_professional_led() {
        let filtered = filter_verbs_for_level(
            &["Led", "Delivered"],
            ExperienceLevel::Entry,
            CandidateType::Mid,
        );
        assert_eq!(filtered, vec!["Delivered"]);
    }

    #[test]
    fn test_senior_keeps_all_verbs() {
        let verbs = ["Architected", "Owned", "Built"];
        let filtered =
            filter_verbs_for_level(&verbs, ExperienceLevel::Senior, CandidateType::SeniorExecutive);
        assert_eq!(filtered.len(), verbs.len());
    }
}
