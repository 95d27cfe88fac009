// Shared prompt constants and prompt-building utilities.
// Each domain that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that rewrites resume content.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Every claim in a suggestion must be supported by the candidate's existing resume. \
    Do NOT add skills, tools, employers, titles, degrees, dates, or metrics the resume does not show. \
    You may reword, reorder, quantify what is already implied, and surface adjacent experience honestly. \
    If the resume does not support a keyword, leave it out.";
