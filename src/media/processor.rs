use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use crate::config::MediaConfig;
use crate::error::{Result, StageError};
use super::{AudioExtractor, MediaCommandBuilder, VideoMuxer};

/// FFmpeg-backed media processor
pub struct FfmpegProcessor {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegProcessor {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }

    /// Check if ffmpeg is available
    pub async fn check_availability(&self) -> Result<()> {
        self.command_builder.version_check().execute().await?;
        info!("Media processor is available: {}", self.config.binary_path);
        Ok(())
    }
}

#[async_trait]
impl AudioExtractor for FfmpegProcessor {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> std::result::Result<(), StageError> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        self.command_builder
            .extract_audio(video_path, audio_path)
            .execute()
            .await
            .map_err(|e| StageError::Extraction(e.to_string()))
    }
}

#[async_trait]
impl VideoMuxer for FfmpegProcessor {
    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> std::result::Result<(), StageError> {
        info!("Muxing {} with {} -> {}",
              video_path.display(), audio_path.display(), output_path.display());

        self.command_builder
            .replace_audio(video_path, audio_path, output_path, &self.config.mux_options)
            .execute()
            .await
            .map_err(|e| StageError::Mux(e.to_string()))
    }
}
