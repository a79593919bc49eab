/*!
 * Observers for per-block diagnostics.
 *
 * The caption processor reports every raw block it sees and every block
 * it has to drop. These reports are a side channel: they never change
 * what gets written or in which order.
 */

use log::{debug, warn};

/// Receives diagnostics from the caption processor
pub trait Diagnostics: Send + Sync {
    /// Called with every raw block before it is parsed
    fn on_block(&self, _block: &str) {}

    /// Called with a block that did not match the caption grammar
    fn on_malformed(&self, _block: &str) {}
}

/// Discards all diagnostics
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {}

/// Dumps blocks through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn on_block(&self, block: &str) {
        debug!("{}", dump("Original", block));
    }

    fn on_malformed(&self, block: &str) {
        warn!("{}", dump("Failed match", block));
    }
}

/// Format a titled dump with the body indented by four spaces
pub fn dump(title: &str, text: &str) -> String {
    format!("{}:\n{}", title, indent(text))
}

fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
