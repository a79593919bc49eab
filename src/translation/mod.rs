/*!
 * Translation capability for caption text.
 *
 * - `core`: the `Translator` trait the caption processor depends on, and
 *   `TranslationService`, which binds it to the configured provider
 */

// Re-export main types for easier usage
pub use self::core::{TranslationService, Translator};

// Submodules
pub mod core;
