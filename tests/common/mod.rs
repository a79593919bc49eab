/*!
 * Common test utilities for the srt-translate test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use srt_translate::{Diagnostics, TranslationError, Translator};

/// Two well-formed captions, as produced by most authoring tools
pub const HELLO_WORLD_SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld\n\n";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given raw content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a subtitle text of `count` numbered captions
pub fn numbered_captions(count: usize) -> String {
    (1..=count)
        .map(|i| format!("{}\n00:00:{:02},000 --> 00:00:{:02},500\nLine {}\n\n", i, i % 60, i % 60, i))
        .collect()
}

/// Diagnostics observer that keeps every report in memory
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    pub blocks: Mutex<Vec<String>>,
    pub malformed: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn blocks(&self) -> Vec<String> {
        self.blocks.lock().unwrap().clone()
    }

    pub fn malformed(&self) -> Vec<String> {
        self.malformed.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn on_block(&self, block: &str) {
        self.blocks.lock().unwrap().push(block.to_string());
    }

    fn on_malformed(&self, block: &str) {
        self.malformed.lock().unwrap().push(block.to_string());
    }
}

/// Translator that answers on several lines, like a chatty LLM
#[derive(Debug, Default)]
pub struct MultiLineTranslator;

#[async_trait]
impl Translator for MultiLineTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, TranslationError> {
        Ok(format!("{}\n\nNote: translated literally\n", text))
    }
}
