use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::RecognizerConfig;
use crate::error::{RecognitionError, Result, RedubError};
use crate::language::recognizer_language;
use super::SpeechRecognizer;

/// whisper.cpp JSON output (`-oj`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOutput {
    pub transcription: Vec<WhisperCppSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppSegment {
    pub text: String,
}

impl WhisperCppOutput {
    /// Joined segment text, `None` when nothing was recognized
    pub fn text(&self) -> Option<String> {
        let text = self
            .transcription
            .iter()
            .map(|seg| seg.text.trim())
            .filter(|t| !t.is_empty() && !is_non_speech_marker(t))
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() { None } else { Some(text) }
    }
}

// whisper emits bracketed annotations like "[BLANK_AUDIO]" or "(music)" for non-speech
fn is_non_speech_marker(text: &str) -> bool {
    (text.starts_with('[') && text.ends_with(']')) || (text.starts_with('(') && text.ends_with(')'))
}

/// Recognizer backed by the whisper.cpp CLI
pub struct WhisperCppRecognizer {
    config: RecognizerConfig,
}

impl WhisperCppRecognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        Self { config }
    }

    /// Check if the whisper binary and model are available
    pub async fn check_availability(&self) -> Result<()> {
        if !Path::new(&self.config.model_path).exists() {
            return Err(RedubError::Config(format!(
                "Whisper model not found: {}",
                self.config.model_path
            )));
        }

        let output = Command::new(&self.config.binary_path)
            .arg("--help")
            .output()
            .await
            .map_err(|e| RedubError::Config(format!("Whisper binary not found: {}", e)))?;

        if output.status.success() {
            info!("Speech recognizer is available: {}", self.config.binary_path);
            Ok(())
        } else {
            Err(RedubError::Config("Whisper binary check failed".to_string()))
        }
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperCppRecognizer {
    async fn recognize(&self, audio_path: &Path, source_language: &str) -> std::result::Result<String, RecognitionError> {
        info!("Recognizing speech in {} ({})", audio_path.display(), source_language);

        let temp_dir = tempfile::tempdir()
            .map_err(|e| RecognitionError::Transient(format!("Failed to create temp directory: {}", e)))?;
        let output_prefix = temp_dir.path().join("transcript");

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("-m").arg(&self.config.model_path)
            .arg("-f").arg(audio_path)
            .arg("-l").arg(recognizer_language(source_language))
            .arg("-oj")
            .arg("-of").arg(&output_prefix);

        debug!("Executing whisper command: {:?}", cmd);

        let output = cmd.output().await
            .map_err(|e| RecognitionError::Transient(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Transient(format!("Whisper failed: {}", stderr.trim())));
        }

        let json_file = output_prefix.with_extension("json");
        let json_content = tokio::fs::read_to_string(&json_file).await
            .map_err(|e| RecognitionError::Transient(format!("Failed to read output: {}", e)))?;

        let whisper_output: WhisperCppOutput = serde_json::from_str(&json_content)
            .map_err(|e| RecognitionError::Transient(format!("Failed to parse whisper JSON: {}", e)))?;

        whisper_output.text().ok_or(RecognitionError::Unrecognized)
    }
}
