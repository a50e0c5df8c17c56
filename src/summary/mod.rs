/*!
 * Summarisation of the selected text.
 *
 * - `chunker`: token-budget chunking with question/heading breaks
 * - `orchestrator`: sequential chunk summarisation against a provider
 */

pub use self::chunker::chunk_tokens;
pub use self::orchestrator::{ChunkSummary, Summariser, SummaryRun};

pub mod chunker;
pub mod orchestrator;
