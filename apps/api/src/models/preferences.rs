use serde::{Deserialize, Serialize};

/// Classification of the candidate. Drives weight-profile and generator selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateType {
    CareerChanger,
    CoopEntry,
    #[default]
    Mid,
    SeniorExecutive,
}

impl CandidateType {
    pub const ALL: [CandidateType; 4] = [
        CandidateType::CareerChanger,
        CandidateType::CoopEntry,
        CandidateType::Mid,
        CandidateType::SeniorExecutive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateType::CareerChanger => "career_changer",
            CandidateType::CoopEntry => "coop_entry",
            CandidateType::Mid => "mid",
            CandidateType::SeniorExecutive => "senior_executive",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Professional,
    Confident,
    Conversational,
    Technical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Concise,
    #[default]
    Balanced,
    Detailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    #[default]
    Keywords,
    Impact,
    Skills,
    Leadership,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
    Executive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Coop,
}

/// How far a rewrite may move away from the original wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationLevel {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

/// User-supplied knobs that parameterize suggestion generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationPreferences {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub verbosity: Verbosity,
    #[serde(default)]
    pub emphasis: Emphasis,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub modification_level: ModificationLevel,
}
