/*!
 * # docsum - document reduction and summarisation
 *
 * A Rust library that cuts long course documents down to their most salient
 * sentences and summarises what remains with a local LLM.
 *
 * ## Features
 *
 * - Character sanitising and section/sentence splitting
 * - Pattern passes that move assessment questions, conclusion lines, acronym
 *   runs, table-of-contents entries and course objectives into side files
 * - Near-duplicate removal, topic-aware grouping and statistical scoring
 * - Batch-wise selection that keeps about 60% of the sentences in order
 * - Token-budget chunking and sequential summarisation via Ollama
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `preprocessing`: The reduction pipeline:
 *   - `preprocessing::extract`: Pattern passes and side-channels
 *   - `preprocessing::redundancy`: Near-duplicate filtering
 *   - `preprocessing::topics`: Topic chunking
 *   - `preprocessing::scoring`: Sentence importance
 *   - `preprocessing::selection`: Batch selection
 * - `summary`: Token chunking and the summarisation loop
 * - `providers`: Chat provider interface with Ollama and mock clients
 * - `document`: Input loading and PDF conversion
 * - `file_utils`: File system operations and artifact paths
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod preprocessing;
pub mod providers;
pub mod summary;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ConfigError, ProviderError};
pub use preprocessing::{Preprocessor, Reducer, SideChannel};
pub use summary::{ChunkSummary, Summariser};
