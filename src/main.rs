// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use docsum::app_config::{self, Config};
use docsum::app_controller::Controller;
use docsum::errors::ConfigError;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reduce and summarise documents (default command)
    #[command(alias = "summarise")]
    Summarize(SummarizeArgs),

    /// Generate shell completions for docsum
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct SummarizeArgs {
    /// Input document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing summaries
    #[arg(short, long)]
    force_overwrite: bool,

    /// Model name to use for summarisation
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum number of tokens per chunk
    #[arg(short, long)]
    token_limit: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Also write the reduced text to <base>-preprocessed.txt
    #[arg(short, long)]
    save_preprocessed: bool,

    /// Write side-channels and reduced text without calling the model
    #[arg(short, long)]
    preprocess_only: bool,
}

/// docsum - reduce long course documents and summarise them with a local LLM
#[derive(Parser, Debug)]
#[command(name = "docsum")]
#[command(version)]
#[command(about = "Document reduction and LLM summarisation tool")]
#[command(long_about = "docsum strips a document down to its most salient sentences, pulls out
assessment questions and summary hints, and summarises the rest chunk by chunk.

EXAMPLES:
    docsum unit1.txt                      # Summarise using config.json
    docsum -f unit1.txt                   # Replace an existing summary
    docsum -m mistral -t 1500 unit1.md    # Override model and chunk size
    docsum -p unit1.txt                   # Only write questions, metadata and reduced text
    docsum --log-level debug ./course/    # Process a directory with debug logging
    docsum completions bash > docsum.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in config.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing summaries
    #[arg(short, long)]
    force_overwrite: bool,

    /// Model name to use for summarisation
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum number of tokens per chunk
    #[arg(short, long)]
    token_limit: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Also write the reduced text to <base>-preprocessed.txt
    #[arg(short, long)]
    save_preprocessed: bool,

    /// Write side-channels and reduced text without calling the model
    #[arg(short, long)]
    preprocess_only: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "docsum", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Summarize(args)) => run_summarize(args).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_summarize(SummarizeArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                model: cli.model,
                token_limit: cli.token_limit,
                config_path: cli.config_path,
                log_level: cli.log_level,
                save_preprocessed: cli.save_preprocessed,
                preprocess_only: cli.preprocess_only,
            })
            .await
        }
    }
}

/// Load the configuration, writing a default one when the file is missing
fn load_config(config_path: &str) -> Result<Config> {
    match Config::from_file(config_path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Unreadable { .. }) if !Path::new(config_path).exists() => {
            warn!("Config file not found at '{}', creating default config.", config_path);
            let config = Config::default();
            config
                .save(config_path)
                .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
            Ok(config)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load config file: {}", config_path)),
    }
}

async fn run_summarize(options: SummarizeArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&level));
    }

    let mut config = load_config(&options.config_path)?;

    // Command line overrides
    if let Some(model) = &options.model {
        config.provider.model = model.clone();
    }
    if let Some(token_limit) = options.token_limit {
        config.token_limit = token_limit;
    }
    if options.save_preprocessed {
        config.save_preprocessed = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    if !options.input_path.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    let controller = Controller::with_config(config)?.preprocess_only(options.preprocess_only);
    controller.run(options.input_path, options.force_overwrite).await?;

    Ok(())
}
