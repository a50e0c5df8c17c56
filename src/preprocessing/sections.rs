/*!
 * Section and sentence splitting.
 *
 * Sections are separated by one or more blank lines. Sentences end at `.`, `!`
 * or `?` directly followed by whitespace; the terminator stays with its
 * sentence and the separating whitespace is dropped.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n[ \t\r\f\v]*\n\s*").expect("blank line pattern is valid")
});

/// A sentence of the reduced document
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Sentence text, terminator included
    pub text: String,
    /// Index of the section the sentence came from
    pub section: usize,
    /// Position in the full sentence stream
    pub position: usize,
}

impl Sentence {
    /// Create a new sentence
    pub fn new(text: impl Into<String>, section: usize, position: usize) -> Self {
        Self {
            text: text.into(),
            section,
            position,
        }
    }
}

/// Split sanitized text into blank-line-delimited sections.
///
/// Empty sections are kept so section indices stay aligned with the source.
pub fn split_sections(text: &str) -> Vec<&str> {
    BLANK_LINES.split(text).collect()
}

/// Split text into sentences, dropping blank fragments
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(next_idx, next)) = chars.peek() else {
            continue;
        };
        if !next.is_whitespace() {
            continue;
        }

        push_fragment(&mut sentences, &text[start..idx + c.len_utf8()]);

        // Skip the separating whitespace run
        let mut resume = next_idx;
        while let Some(&(ws_idx, ws)) = chars.peek() {
            if !ws.is_whitespace() {
                break;
            }
            resume = ws_idx + ws.len_utf8();
            chars.next();
        }
        start = resume;
    }

    if start < text.len() {
        push_fragment(&mut sentences, &text[start..]);
    }

    sentences
}

fn push_fragment<'a>(sentences: &mut Vec<&'a str>, fragment: &'a str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

/// Build the positioned sentence stream from reduced section texts
pub fn sentence_stream<S: AsRef<str>>(sections: &[S]) -> Vec<Sentence> {
    let mut stream = Vec::new();
    for (section_index, section) in sections.iter().enumerate() {
        for text in split_sentences(section.as_ref()) {
            let position = stream.len();
            stream.push(Sentence::new(text, section_index, position));
        }
    }
    stream
}
