//! Failure-pattern extraction from judge reasoning on fail/borderline verdicts.
//!
//! Two passes: named themes matched by trigger phrases, then recurring word pairs that
//! show up in at least `MIN_PHRASE_ENTRIES` distinct entries.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::text::tokenize;

const MIN_PHRASE_ENTRIES: usize = 2;
const MAX_PHRASES: usize = 5;

/// Triggers match whole tokens; a trailing `*` lets the last word match as a prefix.
const THEMES: &[(&str, &[&str])] = &[
    (
        "fabrication",
        &["fabricat*", "invented", "not supported", "unsupported", "exaggerat*", "not in the original"],
    ),
    (
        "vagueness",
        &["vague*", "generic*", "lacks specific*", "no metric*", "unquantified", "filler"],
    ),
    (
        "keyword_stuffing",
        &["keyword stuffing", "stuffed", "forced keyword*", "unnatural*"],
    ),
    ("tone", &["tone*", "too casual", "informal*", "buzzword*"]),
    ("length", &["too long", "verbose", "wordy", "too short", "run-on"]),
    ("irrelevance", &["irrelevant", "not relevant", "off-topic", "unrelated"]),
];

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "in",
    "is", "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "were", "with",
    "which", "while", "not", "no", "does", "do", "suggestion", "original", "suggested", "text",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Theme,
    Phrase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePattern {
    pub pattern: String,
    pub kind: PatternKind,
    /// Number of distinct entries exhibiting the pattern.
    pub occurrences: usize,
}

fn trigger_matches(tokens: &[String], trigger: &str) -> bool {
    let (phrase, prefix) = match trigger.strip_suffix('*') {
        Some(stem) => (stem, true),
        None => (trigger, false),
    };
    let needle = tokenize(phrase);
    let Some((last, head)) = needle.split_last() else {
        return false;
    };

    tokens.windows(needle.len()).any(|window| {
        let tail = &window[head.len()];
        &window[..head.len()] == head
            && if prefix {
                tail.starts_with(last.as_str())
            } else {
                tail == last
            }
    })
}

/// Themes first (most frequent first), then recurring phrases.
pub fn extract_failure_patterns<'a, I>(reasonings: I) -> Vec<FailurePattern>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut theme_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut phrase_counts: BTreeMap<String, usize> = BTreeMap::new();

    for reasoning in reasonings {
        let tokens = tokenize(reasoning);
        for (theme, triggers) in THEMES {
            if triggers.iter().any(|t| trigger_matches(&tokens, t)) {
                *theme_counts.entry(*theme).or_default() += 1;
            }
        }

        let words: Vec<String> = tokens
            .into_iter()
            .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
            .collect();
        let bigrams: HashSet<String> = words
            .windows(2)
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .collect();
        for bigram in bigrams {
            *phrase_counts.entry(bigram).or_default() += 1;
        }
    }

    let mut themes: Vec<FailurePattern> = theme_counts
        .into_iter()
        .map(|(theme, occurrences)| FailurePattern {
            pattern: theme.to_string(),
            kind: PatternKind::Theme,
            occurrences,
        })
        .collect();
    themes.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));

    let mut phrases: Vec<FailurePattern> = phrase_counts
        .into_iter()
        .filter(|(_, n)| *n >= MIN_PHRASE_ENTRIES)
        .map(|(pattern, occurrences)| FailurePattern {
            pattern,
            kind: PatternKind::Phrase,
            occurrences,
        })
        .collect();
    phrases.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    phrases.truncate(MAX_PHRASES);

    themes.extend(phrases);
    themes
}
