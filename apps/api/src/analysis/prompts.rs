// Prompt constants for keyword extraction.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Marker the extraction prompt always carries.
pub const EXTRACTION_TASK_MARKER: &str = "TASK: KEYWORD_EXTRACTION";

pub fn extraction_system() -> String {
    format!(
        "You are an expert technical recruiter who reads job descriptions the way an \
        applicant tracking system does. {JSON_ONLY_SYSTEM}"
    )
}

/// Keyword extraction prompt template. Replace `{jd_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"TASK: KEYWORD_EXTRACTION

Extract every keyword an applicant tracking system would screen for in the job description below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "keywords": [
    {"text": "Python", "category": "technologies", "importance": "high"}
  ],
  "minimum_years_experience": 5
}

CATEGORY (pick exactly one per keyword):
- "skills": practices and capabilities ("API design", "data modeling")
- "technologies": languages, frameworks, platforms, tools ("Rust", "Kubernetes")
- "qualifications": degrees and formal requirements ("BSc Computer Science")
- "experience": domain or role experience ("fintech", "team leadership")
- "soft_skills": interpersonal traits ("communication", "mentoring")
- "certifications": named certifications ("AWS Solutions Architect")

IMPORTANCE:
- "high": stated as required, must-have, minimum, or repeated prominently
- "medium": part of the core responsibilities but not stated as mandatory
- "low": nice to have, preferred, bonus, "a plus"
When unsure between two tiers, choose the HIGHER one.

RULES:
- Use the wording of the job description; do not invent synonyms.
- One entry per distinct keyword. Keep entries short (1-4 words).
- "minimum_years_experience" is the smallest number of years explicitly required, or null.

JOB DESCRIPTION:
{jd_text}"#;

pub fn extraction_prompt(jd_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE.replace("{jd_text}", jd_text)
}
