//! Supported language pairs.
//!
//! Source languages are region-qualified locales handed to the recognizer,
//! target languages are bare codes handed to the translator and synthesizer.

use crate::error::{RedubError, Result};

pub const SOURCE_LANGUAGES: &[&str] = &["en-US", "it-IT", "es-MX", "ru-RU", "de-DE", "ja-JP", "pt-BR"];
pub const TARGET_LANGUAGES: &[&str] = &["en", "it", "es", "ru", "de", "ja", "pt"];

/// Validate a source/target pair before any work starts
pub fn validate(source_language: &str, target_language: &str) -> Result<()> {
    check("source language", source_language, SOURCE_LANGUAGES)?;
    check("target language", target_language, TARGET_LANGUAGES)
}

fn check(field: &'static str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(RedubError::InvalidLanguage {
            field,
            value: value.to_string(),
            allowed: allowed.join(", "),
        })
    }
}

/// Language code for the recognizer: the primary subtag of a locale (`en-US` -> `en`)
pub fn recognizer_language(source_language: &str) -> &str {
    source_language
        .split(['-', '_'])
        .next()
        .unwrap_or(source_language)
}

/// English name for a language code or locale
pub fn language_name(code: &str) -> &'static str {
    match recognizer_language(code).to_lowercase().as_str() {
        "en" => "English",
        "it" => "Italian",
        "es" => "Spanish",
        "ru" => "Russian",
        "de" => "German",
        "ja" => "Japanese",
        "pt" => "Portuguese",
        _ => "Unknown",
    }
}
