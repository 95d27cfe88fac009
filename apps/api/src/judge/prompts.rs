// Prompt constants for the suggestion judge.

use crate::judge::context::SuggestionContext;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

pub const JUDGE_TASK_MARKER: &str = "TASK: SUGGESTION_JUDGE";

pub fn judge_system() -> String {
    format!(
        "You are a strict reviewer of resume edits. You reward honest, specific, relevant \
        rewrites and penalize anything the original resume does not support. {JSON_ONLY_SYSTEM}"
    )
}

const JUDGE_CRITERIA: &str = "Score the proposed resume edit on four criteria, each 0-100:
- accuracy: the suggested text preserves the facts of the original (no changed numbers, titles, scope)
- relevance: the edit moves the resume toward the job description excerpt
- honesty: nothing is claimed that the original does not support; UNSUPPORTED keywords appearing in the suggestion are fabrication and must score below 40
- specificity: concrete, measurable, free of filler";

const JUDGE_REPLY_SCHEMA: &str = r#"Return a JSON object with this EXACT schema:
{
  "accuracy": {"score": 85, "reasoning": "..."},
  "relevance": {"score": 70, "reasoning": "..."},
  "honesty": {"score": 90, "reasoning": "..."},
  "specificity": {"score": 60, "reasoning": "..."},
  "reasoning": "one or two sentences summarizing the verdict"
}"#;

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// Built in a single `format!` pass: suggestion text is inserted verbatim and is never
/// re-scanned for placeholders.
pub fn judge_prompt(ctx: &SuggestionContext) -> String {
    let original = if ctx.original_text.is_empty() {
        "(new content)"
    } else {
        ctx.original_text.as_str()
    };

    format!(
        "{JUDGE_TASK_MARKER}\n\n\
        {JUDGE_CRITERIA}\n\n\
        Section: {section}\n\
        Current ATS score: {ats_score}/100\n\n\
        ORIGINAL:\n{original}\n\n\
        SUGGESTED:\n{suggested}\n\n\
        KEYWORDS ALREADY MATCHED: {matched}\n\
        KEYWORDS THE RESUME COULD HONESTLY ADDRESS: {addressable}\n\
        UNSUPPORTED KEYWORDS (no resume evidence): {unsupported}\n\n\
        JOB DESCRIPTION EXCERPT:\n{jd_excerpt}\n\n\
        {JUDGE_REPLY_SCHEMA}",
        section = ctx.section.as_str(),
        ats_score = ctx.ats_score,
        suggested = ctx.suggested_text,
        matched = list(&ctx.matched_keywords),
        addressable = list(&ctx.addressable_keywords),
        unsupported = list(&ctx.unsupported_keywords),
        jd_excerpt = ctx.jd_excerpt,
    )
}
