// Speech synthesis stage
//
// - Command: espeak-ng compatible command line TTS engine

pub mod command;

use async_trait::async_trait;
use std::path::Path;

pub use command::CommandSynthesizer;

use crate::error::StageError;

/// Speaks translated text into an audio file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` in `target_language` and write it to `audio_path`
    async fn synthesize(&self, text: &str, target_language: &str, audio_path: &Path) -> Result<(), StageError>;
}
