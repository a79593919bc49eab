use futures::StreamExt;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::app_config::Config;
use crate::diagnostics::{Diagnostics, LogDiagnostics, SilentDiagnostics};
use crate::encoding;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{SubtitleProcessor, segment_blocks};
use crate::translation::{TranslationService, Translator};

// @module: Application controller for subtitle translation

/// Counters for one translation run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Captions written to the output
    pub written: usize,
    /// Non-empty blocks dropped because they did not parse
    pub dropped: usize,
}

/// Translate already decoded text, writing each caption as soon as it is ready.
///
/// Up to `concurrent_requests` captions are translated at the same time;
/// output order always equals input order. The first translation failure
/// (in input order) stops the run. Captions written before it stay written.
pub async fn translate_stream<W>(
    text: &str,
    processor: &SubtitleProcessor<'_>,
    sink: &mut W,
    concurrent_requests: usize,
) -> Result<PipelineStats, AppError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut stats = PipelineStats::default();

    let mut results = futures::stream::iter(segment_blocks(text))
        .map(|block| async move { (block.trim().is_empty(), processor.translate_caption(block).await) })
        .buffered(concurrent_requests.max(1));

    while let Some((is_blank, result)) = results.next().await {
        match result? {
            Some(caption) => {
                sink.write_all(format!("{}\n\n", caption).as_bytes()).await?;
                sink.flush().await?;
                stats.written += 1;
            }
            None if is_blank => {}
            None => stats.dropped += 1,
        }
    }

    Ok(stats)
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation backend
    translator: Box<dyn Translator>,

    // @field: Block diagnostics observer
    diagnostics: Box<dyn Diagnostics>,
}

impl Controller {
    // @method: Create a new controller translating through the configured provider
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(format!("{:#}", e)))?;
        let translator = TranslationService::new(config.translation.clone())
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self::with_translator(config, Box::new(translator)))
    }

    /// Create a controller with an explicit translator
    pub fn with_translator(config: Config, translator: Box<dyn Translator>) -> Self {
        Self {
            config,
            translator,
            diagnostics: Box::new(SilentDiagnostics),
        }
    }

    /// Enable or disable block dumps through the logger
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.diagnostics = if enabled {
            Box::new(LogDiagnostics)
        } else {
            Box::new(SilentDiagnostics)
        };
        self
    }

    /// Replace the diagnostics observer
    pub fn with_diagnostics(mut self, diagnostics: Box<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decode and translate a subtitle byte buffer into `sink`
    pub async fn translate_bytes<W>(&self, bytes: &[u8], sink: &mut W) -> Result<PipelineStats, AppError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let text = encoding::decode(bytes, &self.config.encoding)?;

        let processor = SubtitleProcessor::new(
            self.translator.as_ref(),
            self.config.source_language.as_str(),
            self.config.target_language.as_str(),
        )
        .with_diagnostics(self.diagnostics.as_ref());

        debug!(
            "Translating from {} to {} with up to {} concurrent request(s)",
            processor.source_language(),
            processor.target_language(),
            self.config.translation.common.concurrent_requests
        );

        translate_stream(&text, &processor, sink, self.config.translation.common.concurrent_requests).await
    }

    /// Run the main workflow: read `input_file`, write the translation to `sink`
    pub async fn run<W>(&self, input_file: &Path, sink: &mut W) -> Result<PipelineStats, AppError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let start_time = Instant::now();

        let bytes = FileManager::read_bytes(input_file)?;
        let stats = self.translate_bytes(&bytes, sink).await?;

        info!(
            "Translated {} caption(s) from {} in {:.1}s ({} malformed block(s) dropped)",
            stats.written,
            input_file.display(),
            start_time.elapsed().as_secs_f64(),
            stats.dropped
        );

        Ok(stats)
    }
}
