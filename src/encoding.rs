/*!
 * Input decoding.
 *
 * Subtitle files arrive as raw bytes in whatever legacy encoding the
 * authoring tool used. Everything downstream works on UTF-8 text with
 * `\n` line endings, so this module is the only place that deals with
 * bytes.
 */

use std::borrow::Cow;

use encoding_rs::Encoding;
use log::debug;

use crate::errors::DecodeError;

/// Encoding assumed when none is configured
pub const DEFAULT_ENCODING: &str = "latin1";

/// Labels decoded with the exact ISO-8859-1 mapping.
///
/// The WHATWG table used by `encoding_rs` maps these labels to windows-1252,
/// which reinterprets 0x80..0x9F. Every byte is a valid Latin-1 code point,
/// so these labels never fail.
const LATIN1_LABELS: &[&str] = &["latin1", "latin-1", "l1", "iso-8859-1", "iso8859-1", "iso_8859-1"];

/// A resolved source encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Byte value equals code point
    Latin1,
    /// Any encoding known to the WHATWG label table
    Whatwg(&'static Encoding),
}

impl SourceEncoding {
    /// Resolve an encoding label such as `latin1`, `utf-8` or `windows-1251`
    pub fn for_label(label: &str) -> Result<Self, DecodeError> {
        let normalized = label.trim().to_lowercase();

        if LATIN1_LABELS.contains(&normalized.as_str()) {
            return Ok(Self::Latin1);
        }

        Encoding::for_label(normalized.as_bytes())
            .map(Self::Whatwg)
            .ok_or_else(|| DecodeError::UnknownEncoding(label.to_string()))
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::Whatwg(encoding) => encoding.name(),
        }
    }

    /// Decode bytes into text, failing on any malformed sequence
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, DecodeError> {
        match self {
            Self::Latin1 => Ok(encoding_rs::mem::decode_latin1(bytes)),
            Self::Whatwg(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or_else(|| DecodeError::Malformed {
                    encoding: encoding.name().to_string(),
                }),
        }
    }
}

/// Decode a byte buffer into canonical text.
///
/// The result has a leading byte-order mark removed and all line endings
/// (`\r\n`, lone `\r`) rewritten to `\n`.
pub fn decode(bytes: &[u8], label: &str) -> Result<String, DecodeError> {
    let encoding = SourceEncoding::for_label(label)?;
    let text = encoding.decode(bytes)?;
    debug!("Decoded {} bytes as {}", bytes.len(), encoding.name());

    let text = text.strip_prefix('\u{feff}').unwrap_or(&*text);
    Ok(normalize_line_endings(text))
}

/// Rewrite `\r\n` and lone `\r` to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
