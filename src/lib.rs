/*!
 * # srt-translate
 *
 * A Rust library for translating SubRip (`.srt`) subtitle files caption by caption.
 *
 * ## Features
 *
 * - Decode subtitle files from legacy encodings (Latin-1 by default)
 * - Split text into caption blocks and parse id, timecode and content
 * - Drop malformed captions without stopping the run
 * - Translate caption text through a pluggable `Translator`:
 *   - Google Translate web endpoint
 *   - Ollama (local LLM)
 * - Stream translated captions to any async writer, in input order
 * - Optional bounded concurrency with ordered output
 *
 * ## Architecture
 *
 * Modules, from input bytes to output records:
 * - `encoding`: Byte decoding and line-ending normalization
 * - `subtitle_processor`: Caption grammar, block segmentation and per-caption translation
 * - `app_controller`: Pipeline driver and application controller
 * - `translation`: The `Translator` capability and the provider-backed service
 * - `providers`: Client implementations for translation backends
 * - `diagnostics`: Observers for dropped and processed blocks
 * - `app_config`: Settings file and defaults
 * - `language_utils`: ISO language code and name utilities
 * - `file_utils`: Reading input files
 * - `errors`: Error enums shared by all modules
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod diagnostics;
pub mod encoding;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod subtitle_processor;
pub mod translation;

// Main types, usable without the module path
pub use app_config::Config;
pub use app_controller::{Controller, PipelineStats, translate_stream};
pub use diagnostics::{Diagnostics, LogDiagnostics, SilentDiagnostics};
pub use errors::{AppError, DecodeError, ProviderError, TranslationError};
pub use subtitle_processor::{Caption, SubtitleProcessor, normalize_content, parse_caption, segment_blocks};
pub use translation::{TranslationService, Translator};
