/*!
 * Pattern-based side-channel extraction.
 *
 * A section goes through nine passes in a fixed order. Every pass takes the
 * text left by the previous one and returns the remaining text together with
 * the fragments it pulled out; nothing is shared between passes except the
 * text itself. Fragments end up in two side-channels:
 *
 * - `questions`: context preceding tutor-marked assessment labels
 * - `summary_hints`: conclusion/summary lines, acronym runs, table-of-contents
 *   entries and course-objectives trailers
 *
 * Table-of-contents entries are inserted at the front of `summary_hints`,
 * every other hint is appended.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::app_config::PreprocessingConfig;
use crate::errors::ConfigError;

use super::redundancy::RedundancyFilter;
use super::sections::split_sentences;
use super::text::{collapse_whitespace, word_count};

static CONCLUSION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:conclusion|summary)\b[ \t]*:?[ \t]*([^\n]*)")
        .expect("conclusion pattern is valid")
});

static TOC_REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^.!?]*\.{5,}").expect("toc pattern is valid")
});

static COURSE_OBJECTIVES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bcourse\s+objectives\b[ \t]*:?[ \t]*([^\n]*)")
        .expect("course objectives pattern is valid")
});

/// Accumulated side-channel fragments of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideChannel {
    /// Assessment question contexts, in extraction order
    pub questions: Vec<String>,
    /// Summary hints; table-of-contents entries come first
    pub summary_hints: Vec<String>,
}

impl SideChannel {
    /// Create an empty side-channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the fragments of one section
    pub fn absorb(&mut self, section: SectionExtraction) {
        self.questions.extend(section.questions);
        self.summary_hints.extend(section.hints);
        for entry in section.toc_entries {
            self.summary_hints.insert(0, entry);
        }
    }

    /// Whether nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() && self.summary_hints.is_empty()
    }
}

/// Result of a single pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Text left for the next pass
    pub text: String,
    /// Fragments removed by this pass, in document order
    pub fragments: Vec<String>,
}

impl Extraction {
    fn untouched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fragments: Vec::new(),
        }
    }
}

/// Everything a section produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionExtraction {
    /// Reduced section text
    pub text: String,
    /// Question contexts, in extraction order
    pub questions: Vec<String>,
    /// Hints to append, in extraction order
    pub hints: Vec<String>,
    /// Table-of-contents entries, in document order
    pub toc_entries: Vec<String>,
}

/// Compiled extraction passes for one run
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    tutor_marked: Regex,
    digit_run: Regex,
    capital_run: Regex,
    min_sentence_words: usize,
    tutor_marked_max_words: usize,
    toc_max_words: usize,
    redundancy: RedundancyFilter,
}

impl PatternExtractor {
    /// Compile the proximity-dependent patterns from the configuration
    pub fn new(config: &PreprocessingConfig) -> Result<Self, ConfigError> {
        let tutor_marked = compile(
            "preprocessing.tutor_marked_proximity",
            &format!(
                r"(?i)\bTUTOR\b\W+(?:\w+\W+){{0,{}}}\bMARKED\b(?:\W+\bASSIGNMENT\b)?",
                config.tutor_marked_proximity
            ),
        )?;

        let digit_run = compile(
            "preprocessing.number_proximity",
            &format!(r"\b\d+\b(?:\W+\b\d+\b){{0,{}}}", config.number_proximity),
        )?;

        // A run needs at least two tokens, so the window never drops below one extra token
        let capital_run = compile(
            "preprocessing.capital_proximity",
            &format!(
                r"\b[A-Z]{{2,}}\b(?:\s+[A-Z]{{2,}}\b){{1,{}}}",
                config.capital_proximity.max(1)
            ),
        )?;

        Ok(Self {
            tutor_marked,
            digit_run,
            capital_run,
            min_sentence_words: config.min_sentence_words,
            tutor_marked_max_words: config.tutor_marked_max_words,
            toc_max_words: config.toc_max_words,
            redundancy: RedundancyFilter::from_proximity(config.common_words_threshold),
        })
    }

    /// Run every pass over one section.
    ///
    /// `summary_max_words` is the density-adjusted limit for conclusion/summary
    /// fragments of the current document.
    pub fn extract_section(&self, section: &str, summary_max_words: usize) -> SectionExtraction {
        let mut output = SectionExtraction::default();

        let text = filter_short_sentences(section, self.min_sentence_words);

        let assessments = self.extract_tutor_marked(&text);
        output.questions = assessments.fragments;

        let conclusions = extract_conclusions(&assessments.text, summary_max_words);
        output.hints.extend(conclusions.fragments);

        let text = collapse_whitespace(&conclusions.text);
        let text = self.remove_digit_runs(&text);
        let text = self.redundancy.filter_text(&text);

        let acronyms = self.extract_capital_runs(&text);
        output.hints.extend(acronyms.fragments);

        let toc = extract_toc(&acronyms.text, self.toc_max_words);
        output.toc_entries = toc.fragments;

        let objectives = extract_course_objectives(&toc.text);
        output.hints.extend(objectives.fragments);

        output.text = collapse_whitespace(&objectives.text);

        debug!(
            "Section reduced from {} to {} words ({} questions, {} hints, {} toc entries)",
            word_count(section),
            word_count(&output.text),
            output.questions.len(),
            output.hints.len(),
            output.toc_entries.len()
        );

        output
    }

    /// Move the context before each tutor-marked assessment label into the questions.
    ///
    /// Labels are located with a plain substring search, so a label repeated
    /// verbatim in the same section always resolves to its first occurrence.
    pub fn extract_tutor_marked(&self, text: &str) -> Extraction {
        let labels: Vec<String> = self
            .tutor_marked
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        if labels.is_empty() {
            return Extraction::untouched(text);
        }

        let mut remaining = text.to_string();
        let mut questions = Vec::new();

        for label in labels {
            let Some(start) = remaining.find(&label) else {
                continue;
            };
            let preceding = &remaining[..start];
            let context_start = preceding.rfind('?').map(|idx| idx + 1).unwrap_or(0);
            let context = preceding[context_start..].trim().to_string();

            if context.is_empty() || word_count(&context) > self.tutor_marked_max_words {
                continue;
            }

            // Only the trimmed context is removed; its surrounding whitespace stays until the final collapse
            remaining = remaining.replace(&context, "");
            questions.push(context);
        }

        Extraction {
            text: remaining,
            fragments: questions,
        }
    }

    /// Delete standalone numbers together with the numbers that closely follow them
    pub fn remove_digit_runs(&self, text: &str) -> String {
        let stripped = self.digit_run.replace_all(text, "");
        collapse_whitespace(&stripped)
    }

    /// Move runs of all-caps tokens into the hints
    pub fn extract_capital_runs(&self, text: &str) -> Extraction {
        let mut runs = Vec::new();
        let remaining = self.capital_run.replace_all(text, |caps: &Captures| {
            runs.push(caps[0].to_string());
            String::new()
        });

        Extraction {
            text: remaining.into_owned(),
            fragments: runs,
        }
    }
}

fn compile(key: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Drop sentences with `min_words` words or fewer
pub fn filter_short_sentences(text: &str, min_words: usize) -> String {
    split_sentences(text)
        .into_iter()
        .filter(|sentence| word_count(sentence) > min_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Move labelled conclusion/summary lines into the hints
pub fn extract_conclusions(text: &str, max_words: usize) -> Extraction {
    extract_labelled_trailer(&CONCLUSION_LABEL, text, max_words)
}

/// Move the text following "course objectives" into the hints
pub fn extract_course_objectives(text: &str) -> Extraction {
    extract_labelled_trailer(&COURSE_OBJECTIVES, text, usize::MAX)
}

fn extract_labelled_trailer(pattern: &Regex, text: &str, max_words: usize) -> Extraction {
    let mut fragments = Vec::new();
    let remaining = pattern.replace_all(text, |caps: &Captures| {
        let trailer = caps
            .get(1)
            .map_or("", |m| m.as_str())
            .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'))
            .trim_end();

        if trailer.is_empty() || word_count(trailer) > max_words {
            caps[0].to_string()
        } else {
            fragments.push(trailer.to_string());
            String::new()
        }
    });

    Extraction {
        text: remaining.into_owned(),
        fragments,
    }
}

/// Pull out table-of-contents entries ending in a dot leader
pub fn extract_toc(text: &str, max_words: usize) -> Extraction {
    let mut entries = Vec::new();
    let remaining = TOC_REGION.replace_all(text, |caps: &Captures| {
        let region = caps[0].trim();
        if word_count(region) > max_words {
            caps[0].to_string()
        } else {
            entries.push(region.to_string());
            String::new()
        }
    });

    Extraction {
        text: remaining.into_owned(),
        fragments: entries,
    }
}

/// Scale the summary fragment limit by lexical density.
///
/// Repetitive documents (low density) get a tighter limit, varied ones a looser one.
pub fn density_adjusted_limit(summary_max_words: usize, density: f64) -> usize {
    let factor = 0.5 + density.clamp(0.0, 1.0);
    ((summary_max_words as f64 * factor).round() as usize).max(1)
}
