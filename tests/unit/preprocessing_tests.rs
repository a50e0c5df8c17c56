/*!
 * Tests for the document reduction pipeline
 */

use std::collections::BTreeMap;

use docsum::app_config::{Config, PreprocessingConfig};
use docsum::preprocessing::extract::filter_short_sentences;
use docsum::preprocessing::redundancy::RedundancyFilter;
use docsum::preprocessing::sanitize::sanitize;
use docsum::preprocessing::scoring::ScoredSentence;
use docsum::preprocessing::sections::split_sentences;
use docsum::preprocessing::selection::BatchSelector;
use docsum::preprocessing::topics::TopicChunker;
use docsum::preprocessing::{PatternExtractor, Preprocessor, Reducer, Sentence};
use crate::common;

fn stream(texts: &[&str]) -> Vec<Sentence> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| Sentence::new(*t, 0, i))
        .collect()
}

/// Test that sanitizing twice changes nothing
#[test]
fn test_sanitize_appliedTwice_shouldBeIdempotent() {
    let inputs = [
        "Plain ASCII text, with punctuation!",
        "Smart “quotes” — dashes • bullets © and émigré",
        "Tabs\tand\nnewlines\r\nstay; [brackets] (parens) {braces} go",
        "",
    ];
    for input in inputs {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once);
    }
}

/// Test the short-sentence scenario
#[test]
fn test_filterShortSentences_scenario_shouldKeepLongSentencesInOrder() {
    let text = "Short one. This is a longer sentence with more than five words indeed. \
                Another long sentence goes here for testing purposes.";
    let filtered = filter_short_sentences(text, 5);

    let kept = split_sentences(&filtered);
    assert_eq!(
        kept,
        vec![
            "This is a longer sentence with more than five words indeed.",
            "Another long sentence goes here for testing purposes.",
        ]
    );
    assert!(kept.iter().all(|s| s.split_whitespace().count() > 5));
}

/// Test the tutor-marked scenario with a preceding question
#[test]
fn test_tutorMarked_withPrecedingQuestion_shouldMoveContextToQuestions() {
    let config = PreprocessingConfig {
        tutor_marked_proximity: 2,
        tutor_marked_max_words: 10,
        ..PreprocessingConfig::default()
    };
    let extractor = PatternExtractor::new(&config).unwrap();
    let section = "What is the capital of France? Explain your reasoning in detail here. \
                   TUTOR MARKED ASSIGNMENT: What is the capital of France? Explain your reasoning in detail here.";

    let result = extractor.extract_tutor_marked(section);

    assert_eq!(result.fragments, vec!["Explain your reasoning in detail here."]);
    assert!(result.text.contains("TUTOR MARKED ASSIGNMENT"));
    assert!(!result.text.contains("Explain your reasoning"));
}

/// Test the batch selection scenario
#[test]
fn test_batchSelector_scenario_shouldKeepTopSixInOriginalOrder() {
    let scores = [5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 6.0, 4.0, 7.0, 0.0];
    let scored: Vec<ScoredSentence> = scores
        .iter()
        .enumerate()
        .map(|(i, score)| ScoredSentence {
            sentence: Sentence::new(format!("sentence {}", i), 0, i),
            score: *score,
        })
        .collect();

    let selected = BatchSelector::with_batch_size(10).select(scored);
    let positions: Vec<usize> = selected.iter().map(|s| s.sentence.position).collect();

    assert_eq!(positions, vec![0, 2, 4, 6, 7, 8]);
}

/// Test that the redundancy filter keeps the first sentence and drops repeats
#[test]
fn test_redundancyFilter_withRepeats_shouldKeepFirstAndDropDuplicates() {
    let sentences = stream(&[
        "The cell membrane controls what enters the cell.",
        "The cell membrane controls what enters the cell.",
        "Mitochondria release energy from stored glucose molecules.",
    ]);
    let kept = RedundancyFilter::from_proximity(7).filter(sentences, |s| s.text.as_str());

    let positions: Vec<usize> = kept.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 2]);
}

/// Test that topic chunks concatenate back to the input sequence
#[test]
fn test_topicChunker_shouldReconstructInput() {
    let sentences = stream(&[
        "Rivers carve valleys over long periods of time.",
        "Valleys widen as rivers meander across the plain.",
        "Parliament passed the budget after a long debate.",
        "The budget debate in parliament lasted two weeks.",
        "Glaciers also shape valleys in colder climates.",
    ]);
    let chunks = TopicChunker::default().chunk(sentences.clone());

    assert!(chunks.len() >= 2);
    let flattened: Vec<Sentence> = chunks.into_iter().flat_map(|c| c.sentences).collect();
    assert_eq!(flattened, sentences);
}

/// Test that table-of-contents entries lead the summary hints
#[test]
fn test_preprocessor_withTocAfterOtherHints_shouldPutTocFirst() {
    let preprocessor = Preprocessor::new(&PreprocessingConfig::default()).unwrap();
    let raw = "In summary: trade raises incomes for both partner countries over time.\n\n\
               The NATIONAL OPEN UNIVERSITY publishes these notes for distance learners everywhere.\n\n\
               Section two covers exchange rates and their causes ........ 17";

    let output = preprocessor.run(raw);
    let hints = &output.side_channel.summary_hints;

    assert_eq!(hints[0], "Section two covers exchange rates and their causes ........");
    assert!(hints.contains(&"trade raises incomes for both partner countries over time.".to_string()));
    assert!(hints.contains(&"NATIONAL OPEN UNIVERSITY".to_string()));
    assert_eq!(hints.len(), 3);
}

/// Test that extracted fragments never reach the selected text
#[test]
fn test_reduce_sampleDocument_shouldExcludeSideChannelText() {
    let config = Config::default();
    let preprocessor = Preprocessor::new(&config.preprocessing).unwrap();
    let reducer = Reducer::new(&config);

    let preprocessed = preprocessor.run(&common::sample_document());
    let reduction = reducer.reduce(preprocessed.sentences());
    let selected = reduction.text();

    assert_eq!(
        preprocessed.side_channel.questions,
        vec!["Describe the role of import prices in detail please."]
    );
    assert!(!selected.contains("Describe the role of import prices"));
    assert!(!selected.contains("TUTOR MARKED"));
    assert!(!selected.contains("........"));
    assert!(reduction.selected_count() < reduction.candidate_count);
}

/// Test that selected sentences keep their document order
#[test]
fn test_reduce_shouldPreservePositions() {
    let texts: Vec<String> = (0..40)
        .map(|i| format!("Sentence number {} discusses topic {} with extra detail words{}.", i, i % 4, i))
        .collect();
    let sentences: Vec<Sentence> = texts
        .iter()
        .enumerate()
        .map(|(i, t)| Sentence::new(t.as_str(), 0, i))
        .collect();

    let reduction = Reducer::with_parts(10, &BTreeMap::new()).reduce(sentences);
    let positions: Vec<usize> = reduction.sentences().map(|s| s.position).collect();

    assert_eq!(positions.len(), 24);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}
