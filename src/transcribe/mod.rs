// Speech recognition stage
//
// The pipeline only depends on the SpeechRecognizer trait; whisper_cpp holds the
// default implementation backed by the whisper.cpp command line tool.

pub mod whisper_cpp;

use async_trait::async_trait;
use std::path::Path;

pub use whisper_cpp::WhisperCppRecognizer;

use crate::error::RecognitionError;

/// Turns recorded speech into text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize speech in `audio_path`; `source_language` is a locale such as `en-US`
    async fn recognize(&self, audio_path: &Path, source_language: &str) -> Result<String, RecognitionError>;
}
