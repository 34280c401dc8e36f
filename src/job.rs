use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RedubError};
use crate::language;

/// Container extensions picked up from the input directory
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// Suffix of the audio extracted from the source video
pub const AUDIO_SUFFIX: &str = "_audio";
/// Suffix of the synthesized target-language audio
pub const TRANSLATED_AUDIO_SUFFIX: &str = "_translated_audio";
/// Container used for both intermediate audio artifacts
pub const ARTIFACT_EXTENSION: &str = "wav";

/// Settings for one batch run. Immutable once the orchestrator starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub source_language: String,
    pub target_language: String,
    pub worker_count: usize,
}

impl JobConfig {
    /// Pre-flight checks; touches no files
    pub fn validate(&self) -> Result<()> {
        language::validate(&self.source_language, &self.target_language)?;

        if self.worker_count == 0 {
            return Err(RedubError::Config("Worker count must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// A video discovered in the input directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoItem {
    pub path: PathBuf,
    /// Location under the input directory, used in reports
    pub relative_path: PathBuf,
}

impl VideoItem {
    pub fn new(path: PathBuf, input_directory: &Path) -> Self {
        let relative_path = pathdiff::diff_paths(&path, input_directory)
            .unwrap_or_else(|| path.clone());
        Self { path, relative_path }
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "mp4".to_string())
    }

    /// Intermediate audio file written next to the source video.
    /// Named after the full file name so `clip.mp4` and `clip.mkv` never share one.
    pub fn artifact_path(&self, suffix: &str) -> PathBuf {
        let file_name = self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.path
            .with_file_name(format!("{}{}.{}", file_name, suffix, ARTIFACT_EXTENSION))
    }

    /// Deterministic output location: `{stem}_translated_{target}.{ext}`
    pub fn output_path(&self, output_directory: &Path, target_language: &str) -> PathBuf {
        output_directory.join(format!(
            "{}{}.{}",
            self.stem(),
            translated_suffix(target_language),
            self.extension()
        ))
    }
}

pub fn translated_suffix(target_language: &str) -> String {
    format!("_translated_{}", target_language)
}

/// Whether a path has one of the recognized video extensions
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
