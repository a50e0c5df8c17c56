/*!
 * Chunk-by-chunk summarisation against a chat provider.
 *
 * A `SummaryRun` is pulled one chunk at a time. Each call to `next` issues a
 * single chat request and only returns once it completed, so the caller can
 * persist every result before the following request is made. The first
 * failure ends the run.
 */

use std::sync::Arc;

use log::{debug, error};

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, Provider};

/// Generated summary of one token chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSummary {
    /// Zero-based chunk index
    pub index: usize,
    /// Number of chunks in the run
    pub total: usize,
    /// Text sent after the prompt template
    pub chunk: String,
    /// Provider reply
    pub content: String,
}

/// Sends chunks to a provider with a fixed prompt template
#[derive(Debug, Clone)]
pub struct Summariser {
    provider: Arc<dyn Provider>,
    model: String,
    prompt_template: String,
}

impl Summariser {
    /// Create a summariser
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, prompt_template: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            prompt_template: prompt_template.into(),
        }
    }

    /// Model requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full prompt for one chunk
    pub fn prompt_for(&self, chunk: &str) -> String {
        format!("{}\n\n{}", self.prompt_template, chunk)
    }

    /// Start a run over the given chunks
    pub fn run(&self, chunks: Vec<String>) -> SummaryRun<'_> {
        SummaryRun {
            summariser: self,
            total: chunks.len(),
            chunks: chunks.into_iter().enumerate(),
            failed: false,
        }
    }

    /// Summarise one chunk
    pub async fn summarise_chunk(&self, chunk: &str) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(self.model.clone(), self.prompt_for(chunk));
        let response = self.provider.complete(request).await?;
        debug!(
            "Model {} used {} prompt / {} completion tokens",
            self.model,
            token_count(response.prompt_tokens),
            token_count(response.completion_tokens)
        );
        Ok(response.content)
    }
}

fn token_count(count: Option<u64>) -> String {
    count.map_or_else(|| "?".to_string(), |n| n.to_string())
}

/// Pull-based iteration over the chunk summaries of one document
#[derive(Debug)]
pub struct SummaryRun<'a> {
    summariser: &'a Summariser,
    total: usize,
    chunks: std::iter::Enumerate<std::vec::IntoIter<String>>,
    failed: bool,
}

impl SummaryRun<'_> {
    /// Number of chunks in the run
    pub fn total(&self) -> usize {
        self.total
    }

    /// Summarise the next chunk.
    ///
    /// Returns `None` once every chunk was summarised or after the first error.
    pub async fn next(&mut self) -> Option<Result<ChunkSummary, ProviderError>> {
        if self.failed {
            return None;
        }
        let (index, chunk) = self.chunks.next()?;

        debug!("Summarising chunk {}/{} ({} bytes)", index + 1, self.total, chunk.len());
        match self.summariser.summarise_chunk(&chunk).await {
            Ok(content) => Some(Ok(ChunkSummary {
                index,
                total: self.total,
                chunk,
                content,
            })),
            Err(e) => {
                error!("Chunk {}/{} failed: {}", index + 1, self.total, e);
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
