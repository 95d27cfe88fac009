// LLM-as-judge quality gate for generated suggestions.

pub mod context;
pub mod evaluator;
pub mod prompts;
pub mod vetting;
