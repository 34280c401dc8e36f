//! Stub stage collaborators for the integration tests.
//!
//! Every stub creates the files a real tool would create so that artifact
//! cleanup and output naming can be checked on disk.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use redub::error::{RecognitionError, StageError};
use redub::job::{JobConfig, AUDIO_SUFFIX};
use redub::media::{AudioExtractor, VideoMuxer};
use redub::pipeline::Stages;
use redub::synthesize::SpeechSynthesizer;
use redub::transcribe::SpeechRecognizer;
use redub::translate::Translator;

/// How the recognizer treats one video, keyed by file stem
#[derive(Debug, Clone, Copy)]
pub enum Speech {
    Clear,
    /// Fails transiently this many times, then succeeds
    FlakyService(usize),
    /// Never recognized
    Mumbled,
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Video stem from an extracted audio path such as `clip.mp4_audio.wav`
fn video_stem_of_audio(audio_path: &Path) -> String {
    let video_name = stem(audio_path).trim_end_matches(AUDIO_SUFFIX).to_string();
    stem(Path::new(&video_name))
}

/// Call counter keyed by video stem
#[derive(Default)]
pub struct Calls(Mutex<HashMap<String, usize>>);

impl Calls {
    fn hit(&self, key: &str) -> usize {
        let mut calls = self.0.lock().unwrap();
        let count = calls.entry(key.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, key: &str) -> usize {
        self.0.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.lock().unwrap().values().sum()
    }
}

/// Shared state of the stub collaborators
#[derive(Default)]
pub struct Studio {
    pub speech: HashMap<String, Speech>,
    pub broken_videos: HashSet<String>,
    pub panicking_videos: HashSet<String>,
    pub stage_delay: Duration,
    pub extractions: Calls,
    pub recognitions: Calls,
    pub muxes: Calls,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Studio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speech(mut self, video_stem: &str, speech: Speech) -> Self {
        self.speech.insert(video_stem.to_string(), speech);
        self
    }

    pub fn with_broken_video(mut self, video_stem: &str) -> Self {
        self.broken_videos.insert(video_stem.to_string());
        self
    }

    pub fn with_panicking_video(mut self, video_stem: &str) -> Self {
        self.panicking_videos.insert(video_stem.to_string());
        self
    }

    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay = delay;
        self
    }

    /// Peak number of items between extraction and mux.
    /// Only meaningful when every item reaches the mux stage.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn stages(self: &Arc<Self>) -> Stages {
        Stages {
            extractor: Arc::new(StubExtractor(self.clone())),
            recognizer: Arc::new(StubRecognizer(self.clone())),
            translator: Arc::new(StubTranslator),
            synthesizer: Arc::new(StubSynthesizer),
            muxer: Arc::new(StubMuxer(self.clone())),
        }
    }
}

pub struct StubExtractor(Arc<Studio>);

#[async_trait]
impl AudioExtractor for StubExtractor {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<(), StageError> {
        let studio = &self.0;
        let name = stem(video_path);
        studio.extractions.hit(&name);

        if studio.broken_videos.contains(&name) {
            return Err(StageError::Extraction(format!("{} has no audio stream", name)));
        }
        if studio.panicking_videos.contains(&name) {
            panic!("extractor crashed on {}", name);
        }

        let now = studio.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        studio.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(studio.stage_delay).await;
        tokio::fs::write(audio_path, format!("words of {}", file_name(video_path))).await
            .map_err(|e| StageError::Extraction(e.to_string()))
    }
}

pub struct StubRecognizer(Arc<Studio>);

#[async_trait]
impl SpeechRecognizer for StubRecognizer {
    async fn recognize(&self, audio_path: &Path, _source_language: &str) -> Result<String, RecognitionError> {
        let studio = &self.0;
        let name = video_stem_of_audio(audio_path);
        let attempt = studio.recognitions.hit(&name);

        match studio.speech.get(&name).copied().unwrap_or(Speech::Clear) {
            Speech::FlakyService(failures) if attempt <= failures => {
                return Err(RecognitionError::Transient("service unavailable".to_string()));
            }
            Speech::Mumbled => return Err(RecognitionError::Unrecognized),
            Speech::Clear | Speech::FlakyService(_) => {}
        }

        // The transcript is whatever the extractor wrote for this item
        tokio::time::sleep(studio.stage_delay).await;
        tokio::fs::read_to_string(audio_path).await
            .map_err(|e| RecognitionError::Transient(format!("audio unreadable: {}", e)))
    }
}

pub struct StubTranslator;

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, StageError> {
        Ok(format!("[{}] {}", target_language, text))
    }
}

pub struct StubSynthesizer;

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, text: &str, _target_language: &str, audio_path: &Path) -> Result<(), StageError> {
        tokio::fs::write(audio_path, text).await
            .map_err(|e| StageError::Synthesis(e.to_string()))
    }
}

pub struct StubMuxer(Arc<Studio>);

#[async_trait]
impl VideoMuxer for StubMuxer {
    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<(), StageError> {
        let studio = &self.0;
        studio.muxes.hit(&stem(video_path));

        let audio = tokio::fs::read(audio_path).await
            .map_err(|e| StageError::Mux(e.to_string()))?;
        let result = tokio::fs::write(output_path, audio).await
            .map_err(|e| StageError::Mux(e.to_string()));

        studio.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn job(input: &Path, output: &Path, workers: usize) -> JobConfig {
    JobConfig {
        input_directory: input.to_path_buf(),
        output_directory: output.to_path_buf(),
        source_language: "en-US".to_string(),
        target_language: "ru".to_string(),
        worker_count: workers,
    }
}

/// Sorted file names in a directory
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Intermediate artifacts left in a directory
pub fn leftover_artifacts(dir: &Path) -> Vec<PathBuf> {
    file_names(dir)
        .into_iter()
        .filter(|name| name.contains("_audio."))
        .map(|name| dir.join(name))
        .collect()
}
