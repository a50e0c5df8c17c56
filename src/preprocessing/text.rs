/*!
 * Shared tokenization helpers.
 *
 * Word counts use plain whitespace splitting. Term sets used for similarity and
 * topic tracking are lowercased with surrounding punctuation trimmed, so
 * "Energy," and "energy" count as the same term.
 */

use std::collections::HashSet;

/// Number of whitespace-delimited words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Normalized term for a single whitespace token, if anything is left
pub fn normalize_term(token: &str) -> Option<String> {
    let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Lowercased terms in order of appearance, duplicates kept
pub fn terms(text: &str) -> Vec<String> {
    text.split_whitespace().filter_map(normalize_term).collect()
}

/// Distinct lowercased terms
pub fn term_set(text: &str) -> HashSet<String> {
    text.split_whitespace().filter_map(normalize_term).collect()
}

/// Collapse every whitespace run to one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ratio of distinct terms to total terms, 0.0 for text without words
pub fn lexical_density(text: &str) -> f64 {
    let all = terms(text);
    if all.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<&String> = all.iter().collect();
    distinct.len() as f64 / all.len() as f64
}
