/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use docsum::app_config::{Config, LogLevel};
use docsum::errors::ConfigError;
use crate::common;

const FULL_CONFIG: &str = r#"{
    "token_limit": 1200,
    "prompt_template": "Summarise the following text:",
    "output": { "suffix": "_digest.txt" },
    "preprocessing": {
        "tutor_marked_proximity": 3,
        "tutor_marked_max_words": 40,
        "summary_max_words": 60,
        "number_proximity": 2,
        "common_words_threshold": 8,
        "capital_proximity": 4,
        "toc_max_words": 15
    },
    "save_preprocessed": true,
    "conversion": { "pdf_to_md": true },
    "provider": { "model": "mistral", "endpoint": "http://127.0.0.1:11434", "timeout_secs": 30 },
    "log_level": "debug"
}"#;

/// Test that every key of a complete file is honoured
#[test]
fn test_fromFile_withAllKeys_shouldLoadEveryValue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "config.json", FULL_CONFIG)?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.token_limit, 1200);
    assert_eq!(config.output.suffix, "_digest.txt");
    assert_eq!(config.preprocessing.tutor_marked_proximity, 3);
    assert_eq!(config.preprocessing.toc_max_words, 15);
    assert_eq!(config.preprocessing.min_sentence_words, 5);
    assert!(config.save_preprocessed);
    assert!(config.conversion.pdf_to_md);
    assert_eq!(config.provider.model, "mistral");
    assert_eq!(config.provider.timeout_secs, 30);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that a missing file is reported as unreadable
#[test]
fn test_fromFile_withMissingFile_shouldBeUnreadable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = Config::from_file(temp_dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    Ok(())
}

/// Test that invalid JSON is reported as malformed
#[test]
fn test_fromFile_withInvalidJson_shouldBeMalformed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "config.json", "{ token_limit: ")?;
    assert!(matches!(Config::from_file(&path), Err(ConfigError::Malformed(_))));
    Ok(())
}

/// Test that a missing preprocessing key is rejected before any processing
#[test]
fn test_fromFile_withMissingPreprocessingKey_shouldBeMalformed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = FULL_CONFIG.replace("\"toc_max_words\": 15", "\"unused\": 0");
    let path = common::create_test_file(temp_dir.path(), "config.json", &content)?;
    assert!(matches!(Config::from_file(&path), Err(ConfigError::Malformed(_))));
    Ok(())
}

/// Test that validation runs as part of loading
#[test]
fn test_fromFile_withEmptyPrompt_shouldBeInvalid() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = FULL_CONFIG.replace("Summarise the following text:", "  ");
    let path = common::create_test_file(temp_dir.path(), "config.json", &content)?;

    match Config::from_file(&path) {
        Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "prompt_template"),
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

/// Test that a saved default configuration loads back and validates
#[test]
fn test_save_defaultConfig_shouldLoadBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("config.json");

    Config::default().save(&path)?;
    let loaded = Config::from_file(&path)?;

    assert_eq!(loaded.token_limit, Config::default().token_limit);
    assert_eq!(loaded.scoring.salience_terms, Config::default().scoring.salience_terms);
    Ok(())
}
