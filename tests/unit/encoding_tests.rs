/*!
 * Tests for input decoding
 */

use srt_translate::encoding::{DEFAULT_ENCODING, SourceEncoding, decode, normalize_line_endings};
use srt_translate::errors::DecodeError;

#[test]
fn test_decode_withDefaultEncoding_shouldDecodeLatin1Accents() {
    // "Café" in ISO-8859-1
    let bytes = b"Caf\xe9";
    assert_eq!(decode(bytes, DEFAULT_ENCODING).unwrap(), "Café");
}

#[test]
fn test_decode_latin1_withC1Bytes_shouldNotUseWindows1252() {
    // 0x80 is the euro sign in windows-1252 but U+0080 in ISO-8859-1
    let text = decode(&[0x80], "iso-8859-1").unwrap();
    assert_eq!(text, "\u{80}");
}

#[test]
fn test_decode_withUtf8Label_shouldDecodeMultiByteText() {
    let text = decode("Grüße".as_bytes(), "utf-8").unwrap();
    assert_eq!(text, "Grüße");
}

#[test]
fn test_decode_withInvalidUtf8_shouldFailWithMalformed() {
    let error = decode(&[0x48, 0xff, 0xfe, 0x49], "utf-8").unwrap_err();
    assert_eq!(
        error,
        DecodeError::Malformed {
            encoding: "UTF-8".to_string()
        }
    );
}

#[test]
fn test_decode_withUnknownLabel_shouldFailWithUnknownEncoding() {
    let error = decode(b"abc", "klingon-8").unwrap_err();
    assert_eq!(error, DecodeError::UnknownEncoding("klingon-8".to_string()));
}

#[test]
fn test_decode_withUtf8Bom_shouldStripBom() {
    let bytes = b"\xef\xbb\xbf1\n00:00:01,000 --> 00:00:02,000\nHi";
    let text = decode(bytes, "utf-8").unwrap();
    assert!(text.starts_with('1'));
}

#[test]
fn test_decode_withCrlfLineEndings_shouldNormalizeToLf() {
    let text = decode(b"1\r\n00:00:01,000 --> 00:00:02,000\r\nHi\r\n\r\n", "latin1").unwrap();
    assert_eq!(text, "1\n00:00:01,000 --> 00:00:02,000\nHi\n\n");
}

#[test]
fn test_normalize_line_endings_withLoneCarriageReturn_shouldRewriteToLf() {
    assert_eq!(normalize_line_endings("a\rb\r\nc"), "a\nb\nc");
    assert_eq!(normalize_line_endings("plain"), "plain");
}

#[test]
fn test_source_encoding_forLabel_withAliases_shouldResolveNames() {
    assert_eq!(SourceEncoding::for_label("Latin-1").unwrap(), SourceEncoding::Latin1);
    assert_eq!(SourceEncoding::for_label(" UTF-8 ").unwrap().name(), "UTF-8");
    assert_eq!(SourceEncoding::for_label("windows-1251").unwrap().name(), "windows-1251");
}
