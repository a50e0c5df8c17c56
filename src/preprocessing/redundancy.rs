/*!
 * Near-duplicate sentence removal.
 *
 * Each sentence is compared with the last sentence that was kept, using the
 * number of shared distinct terms normalized by the geometric mean of both
 * term counts. A dropped sentence never becomes the comparison baseline.
 */

use std::collections::HashSet;

use super::sections::split_sentences;
use super::text::term_set;

/// Similarity filter for consecutive sentences
#[derive(Debug, Clone)]
pub struct RedundancyFilter {
    /// Similarity at or above which a sentence is dropped (0.0-1.0)
    threshold: f64,
}

impl RedundancyFilter {
    /// Create a filter from a 0-10 proximity value
    pub fn from_proximity(proximity: usize) -> Self {
        Self::new(proximity as f64 / 10.0)
    }

    /// Create a filter with a raw 0.0-1.0 threshold
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Keep the items whose text is not a near-duplicate of the previous kept one
    pub fn filter<T, F>(&self, items: Vec<T>, text_of: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        let mut kept: Vec<T> = Vec::with_capacity(items.len());
        let mut baseline: Option<HashSet<String>> = None;

        for item in items {
            let terms = term_set(text_of(&item));
            let redundant = baseline
                .as_ref()
                .is_some_and(|previous| similarity(previous, &terms) >= self.threshold);

            if !redundant {
                baseline = Some(terms);
                kept.push(item);
            }
        }

        kept
    }

    /// Filter a text span and rejoin the surviving sentences with spaces
    pub fn filter_text(&self, text: &str) -> String {
        let sentences = split_sentences(text);
        self.filter(sentences, |s| *s).join(" ")
    }
}

/// Shared distinct terms over the geometric mean of both term counts
pub fn similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count() as f64;
    shared / ((a.len() as f64) * (b.len() as f64)).sqrt()
}
