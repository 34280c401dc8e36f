// Media stages of the dubbing pipeline
//
// - Commands: fluent builder for ffmpeg invocations
// - Processor: ffmpeg-backed audio extraction and audio-track replacement

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::error::StageError;

/// Pulls the audio track out of a video container
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Write the audio of `video_path` to `audio_path`
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<(), StageError>;
}

/// Replaces the audio track of a video container
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoMuxer: Send + Sync {
    /// Combine the video stream of `video_path` with `audio_path` into `output_path`
    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<(), StageError>;
}
