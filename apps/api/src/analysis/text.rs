//! Tokenization and light stemming shared by the matcher, gap classifier and extractor.

/// Lowercases and splits on anything that is not alphanumeric or one of `+ # .`,
/// so that `C++`, `C#`, `Node.js` and `.NET` survive as single tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#' || c == '.'))
        .map(|t| t.trim_end_matches('.'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Crude suffix stripper. Only used for partial matches, never for exact ones.
pub fn stem(token: &str) -> String {
    const SUFFIXES: &[&str] = &[
        "ations", "ation", "ments", "ment", "ings", "ing", "ers", "ies", "es", "ed", "er", "s",
    ];

    let mut word = token.to_string();
    for suffix in SUFFIXES {
        if word.len() >= suffix.len() + 3 && word.ends_with(suffix) {
            // "process" keeps its double s
            if *suffix == "s" && word.ends_with("ss") {
                break;
            }
            word.truncate(word.len() - suffix.len());
            if *suffix == "ies" {
                word.push('y');
            }
            break;
        }
    }
    if word.len() > 4 && word.ends_with('e') {
        word.pop();
    }
    word
}

/// True if `needle` occurs as a contiguous token run inside `haystack`.
pub fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

/// Splits text into rough sentences / clauses for requirement-marker detection.
/// A `.` ends a clause only before whitespace or the end of text, so "Node.js" stays whole.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let boundary = match c {
            '\n' | ';' | '!' | '?' => true,
            '.' => chars.peek().map_or(true, |&(_, next)| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&text[start..]);

    parts.into_iter().map(str::trim).filter(|s| !s.is_empty())
}
