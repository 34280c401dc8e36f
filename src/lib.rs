//! Redub - Batch Video Dubbing
//!
//! Translates the spoken dialogue of every video in a directory: audio is
//! extracted with ffmpeg, recognized with whisper-cpp, translated with ollama,
//! spoken again by a TTS engine and muxed back into the video.

pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod language;
pub mod media;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod synthesize;
pub mod transcribe;
pub mod translate;
