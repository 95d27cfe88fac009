// Deterministic ATS analysis: keyword extraction, matching, gap classification and scoring.

pub mod extractor;
pub mod gaps;
pub mod handlers;
pub mod keywords;
pub mod matcher;
pub mod pipeline;
pub mod prompts;
pub mod quality;
pub mod scoring;
pub mod sections;
pub mod synonyms;
pub mod text;
