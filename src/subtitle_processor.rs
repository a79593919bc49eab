use std::fmt;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{Diagnostics, SilentDiagnostics};
use crate::errors::TranslationError;
use crate::translation::Translator;

// @module: Caption grammar, segmentation and per-caption translation

// @const: Caption header (id line, then timecode line)
// Content has no pattern of its own: it runs from the end of the header to
// the first blank line, see `parse_caption`.
static CAPTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A(?P<id>[0-9]+)\n(?P<timecode>[0-9]+:[0-9]{2}:[0-9]{2},[0-9]{3} --> [0-9]+:[0-9]{2}:[0-9]{2},[0-9]{3})\n",
    )
    .unwrap()
});

// @const: Captions are delimited by two or more newlines
static BLOCK_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

const CONTENT_TERMINATOR: &str = "\n\n";

// @struct: Single parsed caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    // @field: Sequence number, kept verbatim
    pub id: String,

    // @field: `start --> end`, kept verbatim
    pub timecode: String,

    // @field: Single-line text
    pub content: String,
}

impl Caption {
    /// Creates a caption from already normalized parts
    pub fn new(id: impl Into<String>, timecode: impl Into<String>, content: impl Into<String>) -> Self {
        Caption {
            id: id.into(),
            timecode: timecode.into(),
            content: content.into(),
        }
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.id, self.timecode, self.content)
    }
}

/// Split decoded text into raw caption blocks.
///
/// The split is purely lexical and lazy. Trailing delimiters produce an
/// empty final block, which is passed through like any other block.
pub fn segment_blocks(text: &str) -> impl Iterator<Item = &str> {
    BLOCK_DELIMITER.split(text)
}

/// Parse one raw block, returning `None` when it does not match the grammar.
///
/// The match is anchored at the start of the block. Anything after the
/// first blank line is ignored.
pub fn parse_caption(block: &str) -> Option<Caption> {
    let header = CAPTION_HEADER.captures(block)?;
    let id = header.name("id")?.as_str();
    let timecode = header.name("timecode")?.as_str();

    let rest = &block[header.get(0)?.end()..];
    let content = match rest.find(CONTENT_TERMINATOR) {
        Some(end) => &rest[..end],
        None => rest,
    };

    Some(Caption::new(id, timecode, normalize_content(content)))
}

/// Collapse multi-line caption text into a single line.
///
/// Each line is trimmed, whitespace-only lines are skipped and the rest are
/// joined with a single space, so `"A\n  \nB"` becomes `"A B"` rather than
/// `"A  B"`. Applying this twice gives the same result.
pub fn normalize_content(content: &str) -> String {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses raw blocks and replaces their content with a translation
pub struct SubtitleProcessor<'a> {
    translator: &'a dyn Translator,
    diagnostics: &'a dyn Diagnostics,
    source_language: String,
    target_language: String,
}

impl<'a> SubtitleProcessor<'a> {
    /// Create a processor with diagnostics disabled
    pub fn new(
        translator: &'a dyn Translator,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            diagnostics: &SilentDiagnostics,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Route block diagnostics to the given observer
    pub fn with_diagnostics(mut self, diagnostics: &'a dyn Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Parse and translate one block.
    ///
    /// Malformed blocks are reported to the diagnostics observer and yield
    /// `Ok(None)`. A translation failure is returned as an error and is
    /// meant to stop the whole run.
    pub async fn translate_caption(&self, block: &str) -> Result<Option<Caption>, TranslationError> {
        self.diagnostics.on_block(block);

        let Some(mut caption) = parse_caption(block) else {
            self.diagnostics.on_malformed(block);
            return Ok(None);
        };

        // Nothing to send for a caption whose text is blank
        if caption.content.is_empty() {
            trace!("Caption {} has no text, skipping translation", caption.id);
            return Ok(Some(caption));
        }

        let translated = self
            .translator
            .translate(&caption.content, &self.source_language, &self.target_language)
            .await?;

        // A blank line in the reply would start a new record in the output
        caption.content = normalize_content(&translated);

        Ok(Some(caption))
    }

    /// Same as `translate_caption`, serialized as `id\ntimecode\ncontent`
    pub async fn translate_block(&self, block: &str) -> Result<Option<String>, TranslationError> {
        Ok(self.translate_caption(block).await?.map(|caption| caption.to_string()))
    }
}
