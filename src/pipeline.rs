//! Per-video dubbing pipeline.
//!
//! One invocation runs extract -> recognize -> translate -> synthesize -> mux
//! for a single video. Stage failures are returned as an [`ItemOutcome`] so a
//! broken item never aborts the batch, and both intermediate audio files are
//! removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{RecognitionError, Result, StageError};
use crate::job::{JobConfig, VideoItem, AUDIO_SUFFIX, TRANSLATED_AUDIO_SUFFIX};
use crate::media::{AudioExtractor, FfmpegProcessor, VideoMuxer};
use crate::synthesize::{CommandSynthesizer, SpeechSynthesizer};
use crate::transcribe::{SpeechRecognizer, WhisperCppRecognizer};
use crate::translate::{OllamaTranslator, Translator};

/// Attempts per pass shared by transient and unrecognized failures
pub const MAX_RECOGNITION_ATTEMPTS: u32 = 3;

/// The five stage collaborators a pipeline drives
#[derive(Clone)]
pub struct Stages {
    pub extractor: Arc<dyn AudioExtractor>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub muxer: Arc<dyn VideoMuxer>,
}

impl Stages {
    /// Default stages: ffmpeg, whisper.cpp, Ollama and a command-line TTS engine
    pub fn from_config(config: &Config) -> Result<Self> {
        let media = Arc::new(FfmpegProcessor::new(config.media.clone()));

        Ok(Self {
            extractor: media.clone(),
            recognizer: Arc::new(WhisperCppRecognizer::new(config.recognizer.clone())),
            translator: Arc::new(OllamaTranslator::new(config.translate.clone())?),
            synthesizer: Arc::new(CommandSynthesizer::new(config.synthesis.clone())),
            muxer: media,
        })
    }
}

/// Result of the recognition retry loop; only the last attempt is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionOutcome {
    Recognized { text: String, attempts: u32 },
    Exhausted { attempts: u32, last_error: RecognitionError },
}

/// Result of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Completed { output: PathBuf, recognition_attempts: u32 },
    Unrecognized { attempts: u32, last_error: RecognitionError },
    Failed(StageError),
}

/// Intermediate files owned by one invocation, removed when dropped
struct ScratchFiles {
    paths: Vec<PathBuf>,
}

impl ScratchFiles {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed intermediate file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove intermediate file {}: {}", path.display(), e),
            }
        }
    }
}

pub struct ItemPipeline {
    stages: Stages,
    source_language: String,
    target_language: String,
    output_directory: PathBuf,
}

impl ItemPipeline {
    pub fn new(stages: Stages, job: &JobConfig) -> Self {
        Self {
            stages,
            source_language: job.source_language.clone(),
            target_language: job.target_language.clone(),
            output_directory: job.output_directory.clone(),
        }
    }

    /// Dub one video
    pub async fn process(&self, item: &VideoItem) -> ItemOutcome {
        let audio_path = item.artifact_path(AUDIO_SUFFIX);
        let translated_audio_path = item.artifact_path(TRANSLATED_AUDIO_SUFFIX);
        let _scratch = ScratchFiles::new(vec![audio_path.clone(), translated_audio_path.clone()]);

        info!("Processing {}", item.relative_path.display());

        match self.run_stages(item, &audio_path, &translated_audio_path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("{} failed at {} stage: {}", item.relative_path.display(), e.stage(), e);
                ItemOutcome::Failed(e)
            }
        }
    }

    async fn run_stages(
        &self,
        item: &VideoItem,
        audio_path: &Path,
        translated_audio_path: &Path,
    ) -> std::result::Result<ItemOutcome, StageError> {
        self.stages.extractor.extract_audio(&item.path, audio_path).await?;

        let (text, recognition_attempts) = match self.transcribe(item, audio_path).await {
            TranscriptionOutcome::Recognized { text, attempts } => (text, attempts),
            TranscriptionOutcome::Exhausted { attempts, last_error } => {
                warn!("Giving up on recognition of {} after {} attempts",
                      item.relative_path.display(), attempts);
                return Ok(ItemOutcome::Unrecognized { attempts, last_error });
            }
        };

        let translated = self.stages.translator.translate(&text, &self.target_language).await?;

        self.stages.synthesizer
            .synthesize(&translated, &self.target_language, translated_audio_path)
            .await?;

        let output = item.output_path(&self.output_directory, &self.target_language);
        self.stages.muxer.replace_audio(&item.path, translated_audio_path, &output).await?;

        info!("Completed {} -> {}", item.relative_path.display(), output.display());
        Ok(ItemOutcome::Completed { output, recognition_attempts })
    }

    /// Recognition with a shared attempt budget for both failure kinds
    pub async fn transcribe(&self, item: &VideoItem, audio_path: &Path) -> TranscriptionOutcome {
        let mut last_error = RecognitionError::Unrecognized;

        for attempt in 1..=MAX_RECOGNITION_ATTEMPTS {
            match self.stages.recognizer.recognize(audio_path, &self.source_language).await {
                Ok(text) => return TranscriptionOutcome::Recognized { text, attempts: attempt },
                Err(e) if e.is_transient() => {
                    warn!("Recognition service error for {} (attempt {}/{}): {}",
                          item.relative_path.display(), attempt, MAX_RECOGNITION_ATTEMPTS, e);
                    last_error = e;
                }
                Err(e) => {
                    warn!("Speech in {} was not recognized (attempt {}/{})",
                          item.relative_path.display(), attempt, MAX_RECOGNITION_ATTEMPTS);
                    last_error = e;
                }
            }
        }

        TranscriptionOutcome::Exhausted {
            attempts: MAX_RECOGNITION_ATTEMPTS,
            last_error,
        }
    }
}
