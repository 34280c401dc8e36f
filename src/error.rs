use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field} '{value}'. Allowed values: {allowed}")]
    InvalidLanguage {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("No video files found in input directory: {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, RedubError>;

/// Failure of a single pipeline stage. Fatal for the item, never for the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("Audio extraction failed: {0}")]
    Extraction(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Remux failed: {0}")]
    Mux(String),

    #[error("Worker failed: {0}")]
    Worker(String),
}

impl StageError {
    /// Short stage name used in reports
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "extract",
            Self::Translation(_) => "translate",
            Self::Synthesis(_) => "synthesize",
            Self::Mux(_) => "mux",
            Self::Worker(_) => "worker",
        }
    }
}

/// Speech recognition failures. Both kinds are retried against the same attempt budget.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("Recognition service error: {0}")]
    Transient(String),

    #[error("Speech could not be recognized")]
    Unrecognized,
}

impl RecognitionError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
