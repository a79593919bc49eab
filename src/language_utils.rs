use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module accepts the ways a language is usually written on a command
/// line (ISO 639-1, ISO 639-2/T, ISO 639-2/B or an English name such as
/// `english`) and turns them into the identifiers providers expect.

/// Identifier asking the provider to detect the source language
pub const AUTO_DETECT: &str = "auto";

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"), // French
    ("ger", "deu"), // German
    ("dut", "nld"), // Dutch
    ("gre", "ell"), // Greek
    ("chi", "zho"), // Chinese
    ("cze", "ces"), // Czech
    ("ice", "isl"), // Icelandic
    ("alb", "sqi"), // Albanian
    ("arm", "hye"), // Armenian
    ("baq", "eus"), // Basque
    ("bur", "mya"), // Burmese
    ("per", "fas"), // Persian
    ("geo", "kat"), // Georgian
    ("may", "msa"), // Malay
    ("mac", "mkd"), // Macedonian
    ("rum", "ron"), // Romanian
    ("slo", "slk"), // Slovak
    ("wel", "cym"), // Welsh
];

/// Whether the value asks for source language detection
pub fn is_auto_detect(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "" | "auto" | "auto-detect" | "autodetect"
    )
}

/// Look up a language from a code or an English name
pub fn lookup_language(value: &str) -> Result<Language> {
    let normalized = value.trim().to_lowercase();

    let by_code = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(part2b, _)| *part2b == normalized)
                .map_or(normalized.as_str(), |(_, part2t)| *part2t);
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    by_code
        .or_else(|| Language::from_name(&title_case(&normalized)))
        .ok_or_else(|| anyhow!("Unknown language: {}", value))
}

/// Resolve a language to ISO 639-1 where one exists, ISO 639-2/T otherwise
pub fn resolve_language(value: &str) -> Result<String> {
    let language = lookup_language(value)?;
    Ok(language
        .to_639_1()
        .map_or_else(|| language.to_639_3().to_string(), |code| code.to_string()))
}

/// Resolve a source language, keeping the auto-detect marker as is
pub fn resolve_source_language(value: &str) -> Result<String> {
    if is_auto_detect(value) {
        return Ok(AUTO_DETECT.to_string());
    }
    resolve_language(value)
}

/// Get the English language name from a code or name
pub fn get_language_name(value: &str) -> Result<String> {
    Ok(lookup_language(value)?.to_name().to_string())
}

// "brazilian portuguese" -> "Brazilian Portuguese"
fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
