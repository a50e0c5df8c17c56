/*!
 * Batch-wise selection of the highest scoring sentences.
 *
 * The scored stream is cut into contiguous batches. Each batch keeps its top
 * 60% by score and emits them in their original order, so the output never
 * reorders sentences within or across batches.
 */

use std::cmp::Ordering;

use super::scoring::ScoredSentence;

/// Share of each batch that survives selection
pub const KEEP_RATIO: f64 = 0.6;

/// Smallest batch size
pub const MIN_BATCH_SIZE: usize = 10;

/// Largest batch size
pub const MAX_BATCH_SIZE: usize = 50;

/// Batch size for a population of `total` sentences
pub fn batch_size_for(total: usize) -> usize {
    (total / 10).clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE)
}

/// How many sentences a batch of `batch_len` keeps
pub fn keep_count(batch_len: usize) -> usize {
    if batch_len == 0 {
        return 0;
    }
    ((batch_len as f64 * KEEP_RATIO).round() as usize).max(1)
}

/// Keeps the top share of each batch in document order
#[derive(Debug, Clone)]
pub struct BatchSelector {
    batch_size: usize,
}

impl BatchSelector {
    /// Selector sized for a population of `total` sentences
    pub fn for_population(total: usize) -> Self {
        Self::with_batch_size(batch_size_for(total))
    }

    /// Selector with an explicit batch size
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Batch size in use
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Select the surviving sentences
    pub fn select(&self, scored: Vec<ScoredSentence>) -> Vec<ScoredSentence> {
        let mut selected = Vec::with_capacity(scored.len());
        let mut remaining = scored.into_iter();

        loop {
            let mut batch: Vec<ScoredSentence> = remaining.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                break;
            }

            let keep = keep_count(batch.len());
            // Stable sort: equal scores stay in document order
            batch.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
            batch.truncate(keep);
            batch.sort_by_key(|s| s.sentence.position);

            selected.extend(batch);
        }

        selected
    }
}
