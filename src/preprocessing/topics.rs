/*!
 * Topic-aware grouping of consecutive sentences.
 *
 * The chunker keeps the union of the words seen in the current chunk. A new
 * sentence that shares less than 30% of its words with that set starts a new
 * chunk; otherwise it joins the current one and its words join the set.
 */

use std::collections::HashSet;

use super::sections::Sentence;
use super::text::term_set;

/// Overlap ratio below which a new topic starts
pub const TOPIC_OVERLAP_THRESHOLD: f64 = 0.30;

/// A run of sentences sharing a topic
#[derive(Debug, Clone, PartialEq)]
pub struct TopicChunk {
    /// Sentences in document order
    pub sentences: Vec<Sentence>,
}

impl TopicChunk {
    /// Sentences joined by single spaces
    pub fn text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of sentences
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether the chunk holds no sentence
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Groups sentences by topic-word overlap
#[derive(Debug, Clone)]
pub struct TopicChunker {
    threshold: f64,
}

impl Default for TopicChunker {
    fn default() -> Self {
        Self {
            threshold: TOPIC_OVERLAP_THRESHOLD,
        }
    }
}

impl TopicChunker {
    /// Group sentences into topic chunks
    pub fn chunk(&self, sentences: Vec<Sentence>) -> Vec<TopicChunk> {
        self.group(sentences, |s| s.text.as_str())
            .into_iter()
            .map(|sentences| TopicChunk { sentences })
            .collect()
    }

    /// Group arbitrary items by the overlap of their text
    pub fn group<T, F>(&self, items: Vec<T>, text_of: F) -> Vec<Vec<T>>
    where
        F: Fn(&T) -> &str,
    {
        let mut chunks: Vec<Vec<T>> = Vec::new();
        let mut current: Vec<T> = Vec::new();
        let mut topic_words: HashSet<String> = HashSet::new();

        for item in items {
            let words = term_set(text_of(&item));
            let ratio = overlap_ratio(&words, &topic_words);

            if !topic_words.is_empty() && ratio < self.threshold {
                chunks.push(std::mem::take(&mut current));
                topic_words = words;
            } else {
                topic_words.extend(words);
            }
            current.push(item);
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}

/// Share of a sentence's words already present in the topic set
pub fn overlap_ratio(words: &HashSet<String>, topic_words: &HashSet<String>) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    words.intersection(topic_words).count() as f64 / words.len() as f64
}
