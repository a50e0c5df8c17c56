/*!
 * End-to-end tests for single document processing
 */

use std::fs;
use std::sync::Arc;
use anyhow::Result;

use docsum::app_controller::{Controller, DocumentOutcome, SUMMARY_COMPLETE};
use docsum::errors::AppError;
use docsum::file_utils::ArtifactPaths;
use docsum::providers::mock::MockProvider;
use crate::common;

/// Test that a full run writes every artifact and one summary line per chunk
#[tokio::test]
async fn test_processDocument_withWorkingProvider_shouldWriteAllArtifacts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "unit1.txt", &common::sample_document())?;
    let provider = MockProvider::working();
    let controller = Controller::with_provider(common::test_config(20), Arc::new(provider.clone()))?;

    let outcome = controller.process_document(&input, false).await?;
    let paths = ArtifactPaths::for_document(&input, "_summarised.txt");

    let chunks = match outcome {
        DocumentOutcome::Summarised { chunks } => chunks,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert!(chunks >= 2);
    assert_eq!(provider.request_count(), chunks);

    assert_eq!(
        fs::read_to_string(&paths.questions)?,
        "Describe the role of import prices in detail please.\n"
    );
    let metadata = fs::read_to_string(&paths.metadata)?;
    assert!(metadata.starts_with("Unit one introduces the basic history of trade ................\n"));
    assert!(metadata.contains("TUTOR MARKED ASSIGNMENT\n"));

    let summary = fs::read_to_string(&paths.summary)?;
    let expected: Vec<String> = (1..=chunks).map(|i| format!("Summary of chunk {}.", i)).collect();
    assert_eq!(summary.lines().collect::<Vec<_>>(), expected);

    let log = fs::read_to_string(&paths.summary_log)?;
    assert!(log.contains(&format!("Chunk 1/{} input:", chunks)));
    assert!(log.contains(&format!("Chunk {}/{} output:", chunks, chunks)));
    assert!(!log.contains("Describe the role of import prices"));

    assert!(!paths.preprocessed.exists());
    Ok(())
}

/// Test that a mid-document failure keeps the flushed prefix of the summary
#[tokio::test]
async fn test_processDocument_withFailureOnSecondChunk_shouldKeepFirstSummary() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "unit2.txt", &common::sample_document())?;
    let provider = MockProvider::fail_after(1);
    let controller = Controller::with_provider(common::test_config(10), Arc::new(provider.clone()))?;

    let result = controller.process_document(&input, false).await;
    assert!(matches!(result, Err(AppError::Provider(_))));
    assert_eq!(provider.request_count(), 2);

    let paths = ArtifactPaths::for_document(&input, "_summarised.txt");
    assert_eq!(fs::read_to_string(&paths.summary)?, "Summary of chunk 1.\n");
    let log = fs::read_to_string(&paths.summary_log)?;
    assert!(log.contains("output:\nSummary of chunk 1."));
    assert!(!log.contains("Chunk 2/"));
    Ok(())
}

/// Test that an interrupted summary is redone on the next run instead of being skipped
#[tokio::test]
async fn test_processDocument_afterInterruptedRun_shouldSummariseAgain() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "unit2b.txt", &common::sample_document())?;
    let paths = ArtifactPaths::for_document(&input, "_summarised.txt");

    let failing = Controller::with_provider(common::test_config(10), Arc::new(MockProvider::fail_after(1)))?;
    assert!(failing.process_document(&input, false).await.is_err());
    assert_eq!(fs::read_to_string(&paths.summary)?, "Summary of chunk 1.\n");

    let provider = MockProvider::working();
    let controller = Controller::with_provider(common::test_config(10), Arc::new(provider.clone()))?;
    let chunks = match controller.process_document(&input, false).await? {
        DocumentOutcome::Summarised { chunks } => chunks,
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert!(chunks >= 2);
    assert_eq!(provider.request_count(), chunks);
    assert_eq!(fs::read_to_string(&paths.summary)?.lines().count(), chunks);
    assert!(fs::read_to_string(&paths.summary_log)?.contains(&format!("] {}:\n", SUMMARY_COMPLETE)));

    assert_eq!(controller.process_document(&input, false).await?, DocumentOutcome::Skipped);
    assert_eq!(provider.request_count(), chunks);
    Ok(())
}

/// Test that prompts carry the selected text after the template
#[tokio::test]
async fn test_processDocument_withEchoProvider_shouldSummariseSelectedText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "unit3.md", &common::sample_document())?;
    let provider = MockProvider::echo();
    let mut config = common::test_config(2000);
    config.save_preprocessed = true;
    let controller = Controller::with_provider(config, Arc::new(provider.clone()))?;

    controller.process_document(&input, false).await?;

    let paths = ArtifactPaths::for_document(&input, "_summarised.txt");
    let preprocessed = fs::read_to_string(&paths.preprocessed)?;
    let prompts = provider.prompts();

    assert!(!preprocessed.is_empty());
    assert!(prompts.iter().all(|p| p.starts_with("Summarise:\n\n")));
    let sent: Vec<&str> = prompts
        .iter()
        .flat_map(|p| p.trim_start_matches("Summarise:\n\n").split_whitespace())
        .collect();
    assert_eq!(sent, preprocessed.split_whitespace().collect::<Vec<_>>());
    Ok(())
}

/// Test that an existing summary is skipped unless overwriting is forced
#[tokio::test]
async fn test_processDocument_withExistingSummary_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "unit4.txt", &common::sample_document())?;
    common::create_test_file(temp_dir.path(), "unit4_summarised.txt", "previous summary\n")?;
    let provider = MockProvider::working();
    let controller = Controller::with_provider(common::test_config(50), Arc::new(provider.clone()))?;

    assert_eq!(controller.process_document(&input, false).await?, DocumentOutcome::Skipped);
    assert_eq!(provider.request_count(), 0);

    let outcome = controller.process_document(&input, true).await?;
    assert!(matches!(outcome, DocumentOutcome::Summarised { .. }));
    let summary = fs::read_to_string(temp_dir.path().join("unit4_summarised.txt"))?;
    assert!(summary.starts_with("Summary of chunk 1."));
    Ok(())
}

/// Test that preprocess-only mode never calls the provider
#[tokio::test]
async fn test_processDocument_preprocessOnly_shouldNotSummarise() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "unit5.txt", &common::sample_document())?;
    let provider = MockProvider::failing();
    let controller = Controller::with_provider(common::test_config(50), Arc::new(provider.clone()))?
        .preprocess_only(true);

    let outcome = controller.process_document(&input, false).await?;
    let paths = ArtifactPaths::for_document(&input, "_summarised.txt");

    assert_eq!(outcome, DocumentOutcome::Preprocessed);
    assert_eq!(provider.request_count(), 0);
    assert!(paths.questions.exists());
    assert!(paths.metadata.exists());
    assert!(paths.preprocessed.exists());
    assert!(!paths.summary.exists());
    Ok(())
}

/// Test that a PDF is rejected when conversion is disabled
#[tokio::test]
async fn test_processDocument_pdfWithoutConversion_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "unit6.pdf", "%PDF-1.4")?;
    let controller = Controller::with_provider(common::test_config(50), Arc::new(MockProvider::working()))?;

    let result = controller.process_document(&input, false).await;
    assert!(matches!(result, Err(AppError::Conversion(_))));
    Ok(())
}

/// Test that an invalid configuration is rejected before any processing
#[test]
fn test_controller_withZeroTokenLimit_shouldFail() {
    let result = Controller::with_provider(common::test_config(0), Arc::new(MockProvider::working()));
    assert!(matches!(result, Err(AppError::Config(_))));
}
