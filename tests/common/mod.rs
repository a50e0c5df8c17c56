/*!
 * Common test utilities for the docsum test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use docsum::app_config::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A short course unit exercising every extraction pass
pub fn sample_document() -> String {
    [
        "Unit one introduces the basic history of trade ................ page 4",
        "Markets allocate scarce resources between competing uses over time. \
         Prices signal where those resources are most valued by buyers. \
         Firms respond to higher prices by expanding their output gradually.",
        "What drives inflation in small open economies? Describe the role of import \
         prices in detail please. TUTOR MARKED ASSIGNMENT one is due at the end of term.",
        "Central banks raise interest rates when inflation runs above target. \
         Higher borrowing costs slow household spending and business investment. \
         Exchange rates also shift as capital flows chase better returns abroad.",
        "Governments collect taxes to finance roads, schools and public hospitals. \
         Fiscal deficits appear whenever spending exceeds the revenue collected. \
         Persistent deficits add to the stock of public debt over many years.",
        "In conclusion: prices, rates and budgets interact across the whole economy.",
    ]
    .join("\n\n")
}

/// Default configuration with a small chunk budget
pub fn test_config(token_limit: usize) -> Config {
    let mut config = Config::default();
    config.token_limit = token_limit;
    config.prompt_template = "Summarise:".to_string();
    config
}
