#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use srt_translate::Controller;
use srt_translate::app_config::{self, Config, TranslationProvider};
use srt_translate::providers::mock::MockTranslator;

/// `--provider` values
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// `--log-level` values
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
    /// Generate shell completions for srt-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Subtitle file to translate
    #[arg(value_name = "INPUT_FILE")]
    input_path: Option<PathBuf>,

    /// Target language (code or English name) [default: english]
    #[arg(short = 't', long = "to")]
    target_language: Option<String>,

    /// Source language (code, English name or 'auto') [default: auto]
    #[arg(short = 'f', long = "from")]
    source_language: Option<String>,

    /// Encoding of the input file [default: latin1]
    #[arg(short, long)]
    encoding: Option<String>,

    /// Write the translation to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation (Ollama)
    #[arg(short, long)]
    model: Option<String>,

    /// Number of captions translated at the same time
    #[arg(short = 'j', long)]
    concurrent_requests: Option<usize>,

    /// JSON settings file, ignored when it does not exist
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Dump every caption block and every block that fails to parse
    #[arg(short, long)]
    verbose: bool,

    /// Parse and re-serialize without calling any translation provider
    #[arg(long)]
    dry_run: bool,
}

/// srt-translate - translate SubRip subtitle files caption by caption
#[derive(Parser, Debug)]
#[command(name = "srt-translate")]
#[command(version)]
#[command(about = "Translate .srt subtitle files caption by caption")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "srt-translate reads a SubRip subtitle file, translates the text of every caption and
writes the result to standard output. Ids and timecodes are kept as they are; captions
that do not parse are dropped.

EXAMPLES:
    srt-translate movie.srt                          # Translate to English, detect source language
    srt-translate -t fr movie.srt > movie.fr.srt     # Translate to French
    srt-translate -f de -t english -e utf-8 in.srt   # UTF-8 input, German to English
    srt-translate -p ollama -m llama3.2:3b movie.srt # Use a local Ollama model
    srt-translate -v --dry-run movie.srt             # Show which captions would be dropped
    srt-translate completions bash > srt-translate.bash

CONFIGURATION:
    Settings are read from conf.json when it exists (see --config-path).
    Command-line options take precedence over the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Logger writing to stderr, stdout carries the subtitles
// Filtering is left to the global max level, which changes once the config is loaded.
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger, once per process
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
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
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srt-translate", &mut std::io::stdout());
            Ok(())
        }
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_FILE is required when no subcommand is specified"))?;

    let mut config = Config::load(&options.config_path)?;
    apply_overrides(&mut config, &options);

    let mut log_level = config.log_level.to_level_filter();
    if options.verbose {
        log_level = log_level.max(LevelFilter::Debug);
    }
    log::set_max_level(log_level);

    config.validate().context("Configuration validation failed")?;
    debug!("Effective configuration: {:?}", config);

    let controller = if options.dry_run {
        Controller::with_translator(config, Box::new(MockTranslator::identity()))
    } else {
        Controller::with_config(config)?
    }
    .verbose(options.verbose);

    let mut sink: Box<dyn AsyncWrite + Unpin + Send> = match &options.output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };

    let result = controller.run(&input_path, &mut sink).await;
    sink.flush().await?;
    result?;

    Ok(())
}

fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }

    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }

    if let Some(encoding) = &options.encoding {
        config.encoding = encoding.clone();
    }

    if let Some(concurrent_requests) = options.concurrent_requests {
        config.translation.common.concurrent_requests = concurrent_requests;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
