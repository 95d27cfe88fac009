// Prompt construction for the per-section suggestion generators.
// Every prompt carries "RESUME SECTION: <name>" and never includes raw JD text,
// only the gap-filtered keyword context.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};
use crate::models::preferences::JobType;
use crate::models::resume::StructuredResume;
use crate::suggestions::context::GenerationContext;
use crate::suggestions::tone::ToneGuidance;
use crate::suggestions::types::{Section, SuggestionType};

pub const SECTION_MARKER_PREFIX: &str = "RESUME SECTION:";

pub fn generation_system() -> String {
    format!(
        "You are an expert resume editor who optimizes resumes for applicant tracking systems \
        without overstating the candidate. {JSON_ONLY_SYSTEM}"
    )
}

const REPLY_SCHEMA: &str = r#"Return a JSON object with this EXACT schema:
{
  "suggestions": [
    {
      "entry_index": 0,
      "original_text": "the exact text being replaced, or empty if new",
      "suggested_text": "the improved text",
      "suggestion_type": "one of the types allowed for this section",
      "keywords_addressed": ["keyword"],
      "rationale": "one sentence on why this helps"
    }
  ]
}
"entry_index" is the [n] index of the entry being edited, or null for sections without entries.
Return an empty "suggestions" array if nothing can be improved honestly."#;

fn section_rules(section: Section) -> &'static str {
    match section {
        Section::Summary => {
            "Write or rewrite a 2-3 sentence professional summary. Lead with the candidate's \
            actual role and years, then the strongest matched keywords. Return exactly one suggestion."
        }
        Section::Skills => {
            "Suggest skill-list edits: rename skills to the employer's wording when they are the \
            same thing, and surface skills the experience bullets already demonstrate. \
            One suggestion per skill change; original_text is the skill being renamed or empty for an addition."
        }
        Section::Experience => {
            "Rewrite weak experience bullets. Start with a strong verb, keep the original scope, \
            and quantify only with numbers already present. One suggestion per bullet; \
            original_text must be the bullet verbatim."
        }
        Section::Education => {
            "Suggest edits to education details: relevant coursework, honors or projects already \
            listed, phrased with the employer's terminology. Never add degrees or institutions."
        }
        Section::Projects => {
            "Rewrite project descriptions and bullets to surface relevant technologies the project \
            actually used. One suggestion per description or bullet."
        }
    }
}

fn render_section_content(resume: &StructuredResume, section: Section) -> String {
    let mut out = String::new();
    match section {
        Section::Summary => match resume.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(summary) => out.push_str(summary),
            None => out.push_str("(no summary yet: write a new one from the resume below)"),
        },
        Section::Skills => {
            out.push_str(&resume.skills.join(", "));
        }
        Section::Experience => {
            for (i, e) in resume.experience.iter().enumerate() {
                out.push_str(&format!("[{i}] {} at {}\n", e.title, e.company));
                for b in &e.bullets {
                    out.push_str(&format!("  - {b}\n"));
                }
            }
        }
        Section::Education => {
            for (i, e) in resume.education.iter().enumerate() {
                let field = e.field.as_deref().unwrap_or("");
                out.push_str(&format!("[{i}] {} {field}, {}\n", e.degree, e.institution));
                for d in &e.details {
                    out.push_str(&format!("  - {d}\n"));
                }
            }
        }
        Section::Projects => {
            for (i, p) in resume.projects.iter().enumerate() {
                out.push_str(&format!("[{i}] {}", p.name));
                if !p.technologies.is_empty() {
                    out.push_str(&format!(" ({})", p.technologies.join(", ")));
                }
                out.push('\n');
                if let Some(d) = &p.description {
                    out.push_str(&format!("  {d}\n"));
                }
                for b in &p.bullets {
                    out.push_str(&format!("  - {b}\n"));
                }
            }
        }
    }
    out
}

/// Condensed view of the other sections so summary/skills rewrites stay grounded.
fn render_background(resume: &StructuredResume) -> String {
    let mut out = String::new();
    for e in &resume.experience {
        out.push_str(&format!("- {} at {}: {}\n", e.title, e.company, e.bullets.join("; ")));
    }
    for p in &resume.projects {
        out.push_str(&format!("- Project {}: {}\n", p.name, p.bullets.join("; ")));
    }
    if !resume.skills.is_empty() {
        out.push_str(&format!("- Skills: {}\n", resume.skills.join(", ")));
    }
    out
}

fn job_type_label(job_type: JobType) -> &'static str {
    match job_type {
        JobType::FullTime => "full-time",
        JobType::PartTime => "part-time",
        JobType::Contract => "contract",
        JobType::Internship => "internship",
        JobType::Coop => "co-op",
    }
}

pub fn section_prompt(section: Section, ctx: &GenerationContext, tone: &ToneGuidance) -> String {
    let prefs = &ctx.preferences;
    let industry = prefs.industry.as_deref().unwrap_or("unspecified");

    let mut prompt = format!(
        "{SECTION_MARKER_PREFIX} {section}\n\n\
        {NO_FABRICATION_INSTRUCTION}\n\n\
        TARGET: {} role, industry {industry}. Candidate profile: {}. Current ATS score: {}/100.\n\n\
        {}\n\n",
        job_type_label(prefs.job_type),
        ctx.candidate_type.as_str(),
        ctx.ats_score,
        ctx.keywords.render_for_prompt(),
    );

    prompt.push_str(&format!(
        "STYLE:\n- Prefer verbs: {}\n- Avoid: {}\n- {}\n- {}\n- {}\n\n",
        tone.strong_verbs.join(", "),
        tone.avoid_verbs.join(", "),
        tone.length_hint,
        tone.edit_hint,
        tone.emphasis_hint,
    ));

    prompt.push_str(&format!(
        "CURRENT {} CONTENT:\n{}\n\n",
        section.as_str().to_uppercase(),
        render_section_content(&ctx.resume, section)
    ));

    if matches!(section, Section::Summary | Section::Skills) {
        prompt.push_str(&format!(
            "RESUME BACKGROUND (source of truth):\n{}\n",
            render_background(&ctx.resume)
        ));
    }

    let weak = weak_bullets(ctx, section);
    if !weak.is_empty() {
        prompt.push_str("BULLETS WITH NO MEASURABLE IMPACT (improve these first):\n");
        for bullet in weak {
            prompt.push_str(&format!("  - {bullet}\n"));
        }
        prompt.push('\n');
    }

    let allowed: Vec<&str> = SuggestionType::allowed_for(section)
        .iter()
        .map(SuggestionType::as_str)
        .collect();
    prompt.push_str(&format!(
        "TASK: {}\nAllowed suggestion_type values: {}\n\n{REPLY_SCHEMA}",
        section_rules(section),
        allowed.join(", ")
    ));
    prompt
}

/// Unquantified bullets that belong to `section`; only experience and projects carry them.
fn weak_bullets<'a>(ctx: &'a GenerationContext, section: Section) -> Vec<&'a str> {
    let owned: Vec<&String> = match section {
        Section::Experience => ctx.resume.experience.iter().flat_map(|e| &e.bullets).collect(),
        Section::Projects => ctx.resume.projects.iter().flat_map(|p| &p.bullets).collect(),
        _ => return vec![],
    };
    ctx.unquantified_bullets
        .iter()
        .filter(|b| owned.contains(b))
        .map(String::as_str)
        .collect()
}
