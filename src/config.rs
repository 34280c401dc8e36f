use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use crate::error::{Result, RedubError};

fn default_workers() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub job: JobDefaults,
    pub media: MediaConfig,
    pub recognizer: RecognizerConfig,
    pub translate: TranslateConfig,
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDefaults {
    /// Number of videos processed concurrently when not given on the command line
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self { workers: default_workers() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Additional options appended to the remux command
    /// e.g. ["-b:a", "192k"] to raise the audio bitrate
    pub mux_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Path to whisper.cpp CLI binary
    pub binary_path: String,
    /// Path to the ggml model file
    pub model_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Ollama endpoint URL
    pub endpoint: String,
    /// LLM model to use for translation
    pub model: String,
    /// HTTP timeout for a single translation request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Path to the TTS binary (espeak-ng compatible command line)
    pub binary_path: String,
    /// Voice overrides keyed by target language code
    #[serde(default)]
    pub voices: HashMap<String, String>,
}

impl SynthesisConfig {
    /// Voice for a target language, defaulting to the language code itself
    pub fn voice_for<'a>(&'a self, target_language: &'a str) -> &'a str {
        self.voices
            .get(target_language)
            .map(String::as_str)
            .unwrap_or(target_language)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            job: JobDefaults::default(),
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                mux_options: vec![],
            },
            recognizer: RecognizerConfig {
                binary_path: "whisper-cli".to_string(),
                model_path: ".redub/models/ggml-base.bin".to_string(),
            },
            translate: TranslateConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: "llama3.2:3b".to_string(),
                timeout_secs: default_timeout_secs(),
            },
            synthesis: SynthesisConfig {
                binary_path: "espeak-ng".to_string(),
                voices: HashMap::new(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RedubError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RedubError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| RedubError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
