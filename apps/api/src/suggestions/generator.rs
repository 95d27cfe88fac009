//! Section generators. One `SectionGenerator` per resume section; each call is independent
//! of every other so the orchestrator can fan them out.
//!
//! The generator itself applies no timeout; the orchestrator wraps every call in the guard.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_client::{parse_json, LanguageModel};
use crate::models::resume::{ResumeLocation, StructuredResume};
use crate::suggestions::context::GenerationContext;
use crate::suggestions::prompts::{generation_system, section_prompt};
use crate::suggestions::tone::tone_guidance;
use crate::suggestions::types::{GenerationError, Section, Suggestion, SuggestionType};

#[async_trait]
pub trait SectionGenerator: Send + Sync {
    fn section(&self) -> Section;

    async fn generate(&self, ctx: &GenerationContext) -> Result<Vec<Suggestion>, GenerationError>;
}

#[derive(Debug, Deserialize)]
struct GenerationReply {
    #[serde(default)]
    suggestions: Vec<RawSuggestion>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    entry_index: Option<usize>,
    #[serde(default)]
    original_text: String,
    suggested_text: String,
    #[serde(default)]
    suggestion_type: Option<String>,
    #[serde(default)]
    keywords_addressed: Vec<String>,
    #[serde(default)]
    rationale: String,
}

/// LLM-backed generator for a single section.
pub struct LlmSectionGenerator {
    section: Section,
    llm: Arc<dyn LanguageModel>,
}

impl LlmSectionGenerator {
    pub fn new(section: Section, llm: Arc<dyn LanguageModel>) -> Self {
        Self { section, llm }
    }

    /// One generator per section, all sharing the same collaborator.
    pub fn for_sections(
        sections: &[Section],
        llm: &Arc<dyn LanguageModel>,
    ) -> Vec<Arc<dyn SectionGenerator>> {
        sections
            .iter()
            .map(|&section| {
                Arc::new(LlmSectionGenerator::new(section, Arc::clone(llm))) as Arc<dyn SectionGenerator>
            })
            .collect()
    }
}

#[async_trait]
impl SectionGenerator for LlmSectionGenerator {
    fn section(&self) -> Section {
        self.section
    }

    async fn generate(&self, ctx: &GenerationContext) -> Result<Vec<Suggestion>, GenerationError> {
        let tone = tone_guidance(&ctx.preferences, ctx.candidate_type);
        let prompt = section_prompt(self.section, ctx, &tone);

        let text = self
            .llm
            .complete(&prompt, &generation_system())
            .await
            .map_err(|e| GenerationError::from_llm(self.section, e))?;
        let reply: GenerationReply =
            parse_json(&text).map_err(|e| GenerationError::from_llm(self.section, e))?;

        let raw_count = reply.suggestions.len();
        let suggestions: Vec<Suggestion> = reply
            .suggestions
            .into_iter()
            .filter_map(|raw| accept(self.section, raw, ctx))
            .collect();

        debug!(
            "{} generator: kept {}/{} suggestions",
            self.section,
            suggestions.len(),
            raw_count
        );
        Ok(suggestions)
    }
}

/// Validates one raw suggestion. Drops empty or no-op rewrites, entry indexes that do not
/// exist, and anything that introduces an unfixable keyword.
fn accept(section: Section, raw: RawSuggestion, ctx: &GenerationContext) -> Option<Suggestion> {
    let suggested = raw.suggested_text.trim();
    if suggested.is_empty() || suggested == raw.original_text.trim() {
        return None;
    }

    let location = match locate(section, raw.entry_index, &ctx.resume) {
        Ok(location) => location,
        Err(index) => {
            warn!("{section} suggestion references missing entry [{index}], dropping");
            return None;
        }
    };

    let introduced = ctx
        .keywords
        .introduced_unfixable(&raw.original_text, suggested);
    if !introduced.is_empty() {
        warn!(
            "{section} suggestion introduces unsupported keywords {:?}, dropping",
            introduced
        );
        return None;
    }

    let suggestion_type =
        SuggestionType::resolve(section, raw.suggestion_type.as_deref(), &raw.original_text);

    let unfixable = ctx.keywords.unfixable();
    let keywords_addressed = raw
        .keywords_addressed
        .into_iter()
        .filter(|k| !unfixable.iter().any(|u| u.eq_ignore_ascii_case(k)))
        .collect();

    Some(Suggestion::draft(
        section,
        location,
        raw.original_text.trim().to_string(),
        suggested.to_string(),
        keywords_addressed,
        raw.rationale,
    )
    .with_type(suggestion_type))
}

/// Maps a section + entry index onto a resume location. `Err(index)` for an index out of range.
fn locate(
    section: Section,
    entry_index: Option<usize>,
    resume: &StructuredResume,
) -> Result<Option<ResumeLocation>, usize> {
    let entries = match section {
        Section::Summary => {
            return Ok(resume.summary.as_ref().map(|_| ResumeLocation::Summary));
        }
        Section::Skills => return Ok(Some(ResumeLocation::Skills)),
        Section::Experience => resume.experience.len(),
        Section::Education => resume.education.len(),
        Section::Projects => resume.projects.len(),
    };

    match entry_index {
        None => Ok(None),
        Some(i) if i >= entries => Err(i),
        Some(i) => Ok(Some(match section {
            Section::Experience => ResumeLocation::Experience(i),
            Section::Education => ResumeLocation::Education(i),
            _ => ResumeLocation::Projects(i),
        })),
    }
}
