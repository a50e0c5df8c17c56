use log::{error, warn, info, debug};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::document::Document;
use crate::errors::AppError;
use crate::file_utils::{ArtifactPaths, FileManager};
use crate::preprocessing::{Preprocessor, Reducer};
use crate::providers::Provider;
use crate::providers::ollama::Ollama;
use crate::summary::{Summariser, chunk_tokens};

// @module: Application controller for document summarisation

/// Label of the summary log entry written after the last chunk
pub const SUMMARY_COMPLETE: &str = "Summary complete";

/// What happened to one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Every chunk was summarised
    Summarised {
        /// Number of chunks sent to the provider
        chunks: usize,
    },
    /// Side-channels and preprocessed text were written, nothing was summarised
    Preprocessed,
    /// A final summary already existed
    Skipped,
}

/// Totals of a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderReport {
    /// Documents processed successfully
    pub processed: usize,
    /// Documents skipped because their summary existed
    pub skipped: usize,
    /// Documents that failed
    pub failed: usize,
}

/// Main application controller for document summarisation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Chat provider
    provider: Arc<dyn Provider>,
    // @field: Extraction stage
    preprocessor: Preprocessor,
    // @field: Selection stage
    reducer: Reducer,
    // @field: Stop after writing preprocessing artifacts
    preprocess_only: bool,
}

impl Controller {
    // @method: Create a new controller talking to the configured Ollama endpoint
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let provider = Arc::new(Ollama::from_config(&config.provider));
        Self::with_provider(config, provider)
    }

    // @method: Create a new controller with an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Result<Self, AppError> {
        config.validate()?;
        let preprocessor = Preprocessor::new(&config.preprocessing)?;
        let reducer = Reducer::new(&config);

        Ok(Self {
            config,
            provider,
            preprocessor,
            reducer,
            preprocess_only: false,
        })
    }

    /// Only write the preprocessing artifacts, never call the provider
    pub fn preprocess_only(mut self, enabled: bool) -> Self {
        self.preprocess_only = enabled;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process a document, or every document of a directory.
    ///
    /// Unless running preprocess-only, the provider must answer a connection
    /// check before any document is touched.
    pub async fn run(&self, input: PathBuf, force_overwrite: bool) -> Result<(), AppError> {
        if !self.preprocess_only {
            self.provider.test_connection().await.map_err(|e| {
                error!("Chat provider is not reachable: {}", e);
                AppError::Provider(e)
            })?;
        }

        if FileManager::dir_exists(&input) {
            let report = self.run_folder(input, force_overwrite).await?;
            if report.failed > 0 {
                warn!("{} document(s) failed, see the log above", report.failed);
            }
            return Ok(());
        }

        let start_time = std::time::Instant::now();
        let outcome = self.process_document(&input, force_overwrite).await?;
        match outcome {
            DocumentOutcome::Summarised { chunks } => info!(
                "Summarised {:?} in {} chunk(s) in {}",
                input,
                chunks,
                Self::format_duration(start_time.elapsed())
            ),
            DocumentOutcome::Preprocessed => info!("Preprocessed {:?}", input),
            DocumentOutcome::Skipped => {}
        }
        Ok(())
    }

    /// Run the workflow in folder mode, processing all documents in a directory.
    /// A failing document is logged and the next one proceeds.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderReport, AppError> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)));
        }

        let (artifacts, documents): (Vec<PathBuf>, Vec<PathBuf>) = FileManager::find_documents(&input_dir)
            .map_err(file_error)?
            .into_iter()
            .partition(|path| ArtifactPaths::is_artifact(path, &self.config.output.suffix));

        for artifact in &artifacts {
            debug!("Ignoring {:?}, its name matches a generated artifact", artifact);
        }
        for group in ArtifactPaths::shared_bases(&documents) {
            warn!("{:?} share one artifact base name; later files reuse the first one's outputs", group);
        }

        if documents.is_empty() {
            return Err(AppError::File(format!("No documents found in directory: {:?}", input_dir)));
        }

        let mut report = FolderReport::default();

        for document in &documents {
            match self.process_document(document, force_overwrite).await {
                Ok(DocumentOutcome::Skipped) => report.skipped += 1,
                Ok(_) => report.processed += 1,
                Err(e) => {
                    error!("Error processing {:?}: {}", document, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            report.processed,
            report.skipped,
            report.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(report)
    }

    /// Reduce and summarise one document, writing every artifact next to it
    pub async fn process_document(&self, input: &Path, force_overwrite: bool) -> Result<DocumentOutcome, AppError> {
        let paths = ArtifactPaths::for_document(input, &self.config.output.suffix);

        if !self.preprocess_only && paths.summary.exists() && !force_overwrite {
            if Self::summary_is_complete(&paths) {
                warn!("Skipping {:?}, summary already exists (use --force-overwrite to replace it)", input);
                return Ok(DocumentOutcome::Skipped);
            }
            warn!("Summary of {:?} is incomplete, summarising again", input);
        }

        let document = Document::load(input, &self.config.conversion)?;
        info!("Processing {}", document.file_name());

        let preprocessed = self.preprocessor.run(&document.text);
        FileManager::write_lines(&paths.questions, &preprocessed.side_channel.questions).map_err(file_error)?;
        FileManager::write_lines(&paths.metadata, &preprocessed.side_channel.summary_hints).map_err(file_error)?;

        let reduction = self.reducer.reduce(preprocessed.sentences());
        let selected_text = reduction.text();

        if self.config.save_preprocessed || self.preprocess_only {
            FileManager::write_to_file(&paths.preprocessed, &selected_text).map_err(file_error)?;
            debug!("Preprocessed text written to {:?}", paths.preprocessed);
        }

        if self.preprocess_only {
            return Ok(DocumentOutcome::Preprocessed);
        }

        let chunks = chunk_tokens(&selected_text, self.config.token_limit);
        let total = chunks.len();
        self.summarise_chunks(chunks, &paths).await?;

        Ok(DocumentOutcome::Summarised { chunks: total })
    }

    /// Summarise chunks one at a time, flushing both outputs after every chunk
    async fn summarise_chunks(&self, chunks: Vec<String>, paths: &ArtifactPaths) -> Result<(), AppError> {
        let mut summary_log = FileManager::create_writer(&paths.summary_log).map_err(file_error)?;
        let mut summary = FileManager::create_writer(&paths.summary).map_err(file_error)?;

        let summariser = Summariser::new(
            Arc::clone(&self.provider),
            self.config.provider.model.clone(),
            self.config.prompt_template.clone(),
        );
        let mut run = summariser.run(chunks);

        let progress_bar = ProgressBar::new(run.total() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("#>-"));
        progress_bar.set_message(summariser.model().to_string());

        while let Some(result) = run.next().await {
            let chunk_summary = match result {
                Ok(chunk_summary) => chunk_summary,
                Err(e) => {
                    progress_bar.abandon_with_message("failed");
                    return Err(e.into());
                }
            };

            let label = format!("Chunk {}/{}", chunk_summary.index + 1, chunk_summary.total);
            FileManager::write_log_entry(&mut summary_log, &format!("{} input", label), &chunk_summary.chunk).map_err(file_error)?;
            FileManager::write_log_entry(&mut summary_log, &format!("{} output", label), &chunk_summary.content).map_err(file_error)?;
            writeln!(summary, "{}", chunk_summary.content)?;

            summary_log.flush()?;
            summary.flush()?;
            progress_bar.inc(1);
        }

        FileManager::write_log_entry(&mut summary_log, SUMMARY_COMPLETE, &format!("{} chunk(s)", run.total()))
            .map_err(file_error)?;
        summary_log.flush()?;

        progress_bar.finish_with_message("done");
        Ok(())
    }

    /// Whether the summary log records a finished run.
    ///
    /// A summary without a log predates this record and counts as complete.
    fn summary_is_complete(paths: &ArtifactPaths) -> bool {
        match FileManager::read_to_string(&paths.summary_log) {
            Ok(log) => log.contains(&format!("] {}:\n", SUMMARY_COMPLETE)),
            Err(_) => !FileManager::file_exists(&paths.summary_log),
        }
    }

    /// Format a duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

fn file_error(e: anyhow::Error) -> AppError {
    AppError::File(format!("{:#}", e))
}
