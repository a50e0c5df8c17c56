/*!
 * Statistical sentence-importance scoring.
 *
 * A sentence scores the sum of `ln(1 + frequency)` over its words, divided by
 * its word count plus one, with frequencies counted over the whole scored
 * population. Salience words add a flat bonus per occurrence, and sentences
 * in the first or last fifth of the population are boosted.
 */

use std::collections::{BTreeMap, HashMap, HashSet};

use super::sections::Sentence;
use super::text::{normalize_term, terms};

/// Bonus per salience word occurrence
pub const SALIENCE_BONUS: f64 = 2.0;

/// Multiplier for sentences near either end of the document
pub const EDGE_MULTIPLIER: f64 = 1.2;

/// Share of the population counted as "near an end" on each side
pub const EDGE_FRACTION: f64 = 0.2;

/// A sentence with its salience score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    /// The scored sentence
    pub sentence: Sentence,
    /// Non-negative salience score
    pub score: f64,
}

/// Importance scorer over a sentence population
#[derive(Debug, Clone, Default)]
pub struct ImportanceScorer {
    salience_words: HashSet<String>,
}

impl ImportanceScorer {
    /// Build a scorer from key phrases and their synonyms.
    ///
    /// Every word of a key phrase and of each synonym counts as salient.
    pub fn new(salience_terms: &BTreeMap<String, Vec<String>>) -> Self {
        let mut salience_words = HashSet::new();
        for (phrase, synonyms) in salience_terms {
            for entry in std::iter::once(phrase).chain(synonyms.iter()) {
                salience_words.extend(entry.split_whitespace().filter_map(normalize_term));
            }
        }
        Self { salience_words }
    }

    /// Whether a normalized word carries the salience bonus
    pub fn is_salient(&self, word: &str) -> bool {
        self.salience_words.contains(word)
    }

    /// Score every sentence against the frequencies of the whole slice
    pub fn score(&self, sentences: Vec<Sentence>) -> Vec<ScoredSentence> {
        let tokenized: Vec<Vec<String>> = sentences.iter().map(|s| terms(&s.text)).collect();

        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for words in &tokenized {
            for word in words {
                *frequencies.entry(word.as_str()).or_insert(0) += 1;
            }
        }

        let total = sentences.len();
        let scores: Vec<f64> = tokenized
            .iter()
            .enumerate()
            .map(|(index, words)| {
                let base: f64 = words
                    .iter()
                    .map(|w| (1.0 + frequencies.get(w.as_str()).copied().unwrap_or(0) as f64).ln())
                    .sum::<f64>()
                    / (words.len() as f64 + 1.0);

                let bonus = words.iter().filter(|w| self.is_salient(w)).count() as f64 * SALIENCE_BONUS;

                let mut score = base + bonus;
                if is_near_edge(index, total) {
                    score *= EDGE_MULTIPLIER;
                }
                score.max(0.0)
            })
            .collect();

        sentences
            .into_iter()
            .zip(scores)
            .map(|(sentence, score)| ScoredSentence { sentence, score })
            .collect()
    }
}

/// Whether a position falls in the first or last fifth of the population
pub fn is_near_edge(index: usize, total: usize) -> bool {
    if total == 0 {
        return false;
    }
    let position = index as f64;
    let edge = EDGE_FRACTION * total as f64;
    position < edge || position >= total as f64 - edge
}
