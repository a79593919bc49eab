/*!
 * Tests for block diagnostics
 */

use srt_translate::diagnostics::{Diagnostics, LogDiagnostics, SilentDiagnostics, dump};

#[test]
fn test_dump_withMultiLineBlock_shouldIndentEveryLine() {
    let text = dump("Failed match", "garbage\nmore garbage");
    assert_eq!(text, "Failed match:\n    garbage\n    more garbage");
}

#[test]
fn test_dump_withEmptyBlock_shouldKeepTitle() {
    assert_eq!(dump("Original", ""), "Original:\n    ");
}

#[test]
fn test_builtin_observers_withAnyBlock_shouldNotPanic() {
    let _ = env_logger::builder().is_test(true).try_init();

    let observers: [&dyn Diagnostics; 2] = [&SilentDiagnostics, &LogDiagnostics];
    for observer in observers {
        observer.on_block("1\n00:00:01,000 --> 00:00:02,000\nHi");
        observer.on_malformed("garbage");
    }
}
