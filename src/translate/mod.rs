// Text translation stage
//
// - Ollama: LLM translation through the Ollama generate API

pub mod ollama;

use async_trait::async_trait;

pub use ollama::{OllamaTranslator, check_ollama_availability};

use crate::error::StageError;

/// Translates recognized text into the target language
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language` (a bare code such as `ru`)
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, StageError>;
}
