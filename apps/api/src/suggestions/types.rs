//! Suggestion data model shared by generators, the orchestrator and the judge.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::ErrorDetail;
use crate::llm_client::LlmError;
use crate::models::resume::ResumeLocation;

/// Resume sections that have a suggestion generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Summary,
        Section::Skills,
        Section::Experience,
        Section::Education,
        Section::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Projects => "projects",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of edit a suggestion makes. Each section allows a fixed subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    SummaryRewrite,
    SkillRename,
    SkillAddition,
    BulletRewrite,
    Quantification,
    CourseworkHighlight,
    ProjectRewrite,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::SummaryRewrite => "summary_rewrite",
            SuggestionType::SkillRename => "skill_rename",
            SuggestionType::SkillAddition => "skill_addition",
            SuggestionType::BulletRewrite => "bullet_rewrite",
            SuggestionType::Quantification => "quantification",
            SuggestionType::CourseworkHighlight => "coursework_highlight",
            SuggestionType::ProjectRewrite => "project_rewrite",
        }
    }

    pub fn allowed_for(section: Section) -> &'static [SuggestionType] {
        use SuggestionType::*;
        match section {
            Section::Summary => &[SummaryRewrite],
            Section::Skills => &[SkillRename, SkillAddition],
            Section::Experience => &[BulletRewrite, Quantification],
            Section::Education => &[CourseworkHighlight],
            Section::Projects => &[ProjectRewrite, Quantification],
        }
    }

    /// The type the model claimed if the section allows it, otherwise the section's
    /// default. Skills falls back on whether the edit replaces an existing entry.
    pub fn resolve(section: Section, claimed: Option<&str>, original_text: &str) -> SuggestionType {
        let allowed = Self::allowed_for(section);
        if let Some(found) = claimed.and_then(|c| {
            let c = c.trim().to_ascii_lowercase();
            allowed.iter().find(|t| t.as_str() == c)
        }) {
            return *found;
        }
        match section {
            Section::Skills if original_text.trim().is_empty() => SuggestionType::SkillAddition,
            _ => allowed[0],
        }
    }
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a suggestion. Only the user accepts; the judge may only reject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// One proposed rewrite of a piece of resume content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Uuid,
    pub section: Section,
    /// None when the section is written from scratch.
    pub location: Option<ResumeLocation>,
    pub original_text: String,
    pub suggested_text: String,
    pub suggestion_type: SuggestionType,
    pub keywords_addressed: Vec<String>,
    pub rationale: String,
    pub status: SuggestionStatus,
    /// Judged borderline: shown, but flagged.
    #[serde(default)]
    pub low_confidence: bool,
    /// Shown without a judge verdict.
    #[serde(default)]
    pub unvetted: bool,
}

impl Suggestion {
    pub fn draft(
        section: Section,
        location: Option<ResumeLocation>,
        original_text: String,
        suggested_text: String,
        keywords_addressed: Vec<String>,
        rationale: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            section,
            location,
            suggestion_type: SuggestionType::resolve(section, None, &original_text),
            original_text,
            suggested_text,
            keywords_addressed,
            rationale,
            status: SuggestionStatus::Pending,
            low_confidence: false,
            unvetted: false,
        }
    }

    pub fn with_type(mut self, suggestion_type: SuggestionType) -> Self {
        self.suggestion_type = suggestion_type;
        self
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{section} generation timed out after {secs}s")]
    Timeout { section: Section, secs: u64 },

    #[error("{section} generation returned an unexpected shape: {message}")]
    Schema { section: Section, message: String },

    #[error("{section} generation failed: {message}")]
    Llm { section: Section, message: String },

    #[error("{section} generation task aborted: {message}")]
    Aborted { section: Section, message: String },
}

impl GenerationError {
    pub fn from_llm(section: Section, e: LlmError) -> Self {
        match e {
            LlmError::Timeout { secs } => GenerationError::Timeout { section, secs },
            e if e.is_schema_mismatch() => GenerationError::Schema {
                section,
                message: e.to_string(),
            },
            e => GenerationError::Llm {
                section,
                message: e.to_string(),
            },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Timeout { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Timeout { .. } => "GENERATION_TIMEOUT",
            GenerationError::Schema { .. } => "GENERATION_SCHEMA_MISMATCH",
            GenerationError::Llm { .. } => "GENERATION_FAILED",
            GenerationError::Aborted { .. } => "GENERATION_ABORTED",
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code(),
            message: self.to_string(),
        }
    }
}
