/*!
 * Document reduction pipeline.
 *
 * `Preprocessor` turns raw text into reduced section texts plus the
 * side-channel. `Reducer` takes the reduced sentence stream through the
 * redundancy filter, topic chunking, scoring and batch selection.
 */

use std::collections::{BTreeMap, HashSet};

use log::{debug, info};

use crate::app_config::{Config, PreprocessingConfig};
use crate::errors::ConfigError;

use super::extract::{PatternExtractor, SideChannel, density_adjusted_limit};
use super::redundancy::RedundancyFilter;
use super::sanitize::sanitize;
use super::scoring::ImportanceScorer;
use super::sections::{Sentence, sentence_stream, split_sections};
use super::selection::BatchSelector;
use super::text::{lexical_density, word_count};
use super::topics::{TopicChunk, TopicChunker};

/// Output of the extraction stage
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOutput {
    /// Reduced text of each section, in document order
    pub sections: Vec<String>,
    /// Extracted questions and summary hints
    pub side_channel: SideChannel,
    /// Summary fragment limit used for this document after density adjustment
    pub summary_max_words: usize,
}

impl PreprocessOutput {
    /// Positioned sentence stream over all reduced sections
    pub fn sentences(&self) -> Vec<Sentence> {
        sentence_stream(&self.sections)
    }

    /// Non-empty reduced sections joined by single spaces
    pub fn reduced_text(&self) -> String {
        self.sections
            .iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Sanitizes, sectionizes and runs pattern extraction
#[derive(Debug, Clone)]
pub struct Preprocessor {
    extractor: PatternExtractor,
    summary_max_words: usize,
}

impl Preprocessor {
    /// Create a preprocessor from the preprocessing settings
    pub fn new(config: &PreprocessingConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            extractor: PatternExtractor::new(config)?,
            summary_max_words: config.summary_max_words,
        })
    }

    /// Run the extraction stage over a raw document
    pub fn run(&self, raw: &str) -> PreprocessOutput {
        let sanitized = sanitize(raw);
        let density = lexical_density(&sanitized);
        let summary_max_words = density_adjusted_limit(self.summary_max_words, density);
        debug!(
            "Lexical density {:.3}, summary fragment limit {} (configured {})",
            density, summary_max_words, self.summary_max_words
        );

        let mut side_channel = SideChannel::new();
        let mut sections = Vec::new();

        for section in split_sections(&sanitized) {
            let mut extraction = self.extractor.extract_section(section, summary_max_words);
            sections.push(std::mem::take(&mut extraction.text));
            side_channel.absorb(extraction);
        }

        info!(
            "Extracted {} sections: {} questions, {} summary hints",
            sections.len(),
            side_channel.questions.len(),
            side_channel.summary_hints.len()
        );

        PreprocessOutput {
            sections,
            side_channel,
            summary_max_words,
        }
    }
}

/// Output of the selection stage
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionOutput {
    /// Topic chunks restricted to the selected sentences
    pub chunks: Vec<TopicChunk>,
    /// Sentences entering selection, after redundancy filtering
    pub candidate_count: usize,
}

impl ReductionOutput {
    /// Selected sentences, in document order
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.chunks.iter().flat_map(|c| c.sentences.iter())
    }

    /// Number of selected sentences
    pub fn selected_count(&self) -> usize {
        self.chunks.iter().map(TopicChunk::len).sum()
    }

    /// Topic chunks as paragraphs separated by blank lines
    pub fn text(&self) -> String {
        self.chunks
            .iter()
            .map(TopicChunk::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Filters, groups, scores and selects the reduced sentence stream
#[derive(Debug, Clone)]
pub struct Reducer {
    redundancy: RedundancyFilter,
    chunker: TopicChunker,
    scorer: ImportanceScorer,
}

impl Reducer {
    /// Create a reducer from the run configuration
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            config.preprocessing.common_words_threshold,
            &config.scoring.salience_terms,
        )
    }

    /// Create a reducer from its individual settings
    pub fn with_parts(common_words_threshold: usize, salience_terms: &BTreeMap<String, Vec<String>>) -> Self {
        Self {
            redundancy: RedundancyFilter::from_proximity(common_words_threshold),
            chunker: TopicChunker::default(),
            scorer: ImportanceScorer::new(salience_terms),
        }
    }

    /// Reduce a positioned sentence stream
    pub fn reduce(&self, sentences: Vec<Sentence>) -> ReductionOutput {
        let incoming = sentences.len();
        let candidates = self.redundancy.filter(sentences, |s| s.text.as_str());
        let candidate_count = candidates.len();

        let topics = self.chunker.chunk(candidates.clone());

        let selector = BatchSelector::for_population(candidate_count);
        let selected: HashSet<usize> = selector
            .select(self.scorer.score(candidates))
            .into_iter()
            .map(|s| s.sentence.position)
            .collect();

        let chunks: Vec<TopicChunk> = topics
            .into_iter()
            .filter_map(|mut chunk| {
                chunk.sentences.retain(|s| selected.contains(&s.position));
                (!chunk.is_empty()).then_some(chunk)
            })
            .collect();

        let output = ReductionOutput {
            chunks,
            candidate_count,
        };

        info!(
            "Selected {} of {} sentences ({} after redundancy filter, {} topic chunks, batch size {})",
            output.selected_count(),
            incoming,
            candidate_count,
            output.chunks.len(),
            selector.batch_size()
        );
        debug!("Selected text holds {} words", word_count(&output.text()));

        output
    }
}
