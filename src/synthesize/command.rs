use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::SynthesisConfig;
use crate::error::{Result, RedubError, StageError};
use super::SpeechSynthesizer;

/// Synthesizer that shells out to a TTS binary.
///
/// The binary is invoked as `{binary} -v {voice} -w {audio_path} --stdin` and
/// receives the text on standard input, which is the espeak-ng convention.
pub struct CommandSynthesizer {
    config: SynthesisConfig,
}

impl CommandSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// Check if the TTS binary is available
    pub async fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("--version")
            .output()
            .await
            .map_err(|e| RedubError::Config(format!("Synthesizer not found: {}", e)))?;

        if output.status.success() {
            info!("Speech synthesizer is available: {}", self.config.binary_path);
            Ok(())
        } else {
            Err(RedubError::Config("Synthesizer version check failed".to_string()))
        }
    }

    fn command(&self, target_language: &str, audio_path: &Path) -> Command {
        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("-v").arg(self.config.voice_for(target_language))
            .arg("-w").arg(audio_path)
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn synthesize(&self, text: &str, target_language: &str, audio_path: &Path) -> std::result::Result<(), StageError> {
        info!("Synthesizing {} speech to {}", target_language, audio_path.display());

        let mut cmd = self.command(target_language, audio_path);
        debug!("Executing synthesis command: {:?}", cmd);

        let mut child = cmd.spawn()
            .map_err(|e| StageError::Synthesis(format!("Failed to execute synthesizer: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await
                .map_err(|e| StageError::Synthesis(format!("Failed to send text to synthesizer: {}", e)))?;
            // dropping stdin closes the pipe so the synthesizer sees EOF
        }

        let output = child.wait_with_output().await
            .map_err(|e| StageError::Synthesis(format!("Synthesizer did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StageError::Synthesis(stderr.trim().to_string()));
        }

        if !audio_path.exists() {
            return Err(StageError::Synthesis(format!(
                "Synthesizer produced no audio at {}", audio_path.display()
            )));
        }

        Ok(())
    }
}
