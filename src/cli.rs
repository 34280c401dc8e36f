use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dub every video in a directory
    Run {
        /// Directory containing the source videos
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Directory for the dubbed videos (created if missing)
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Spoken language of the source videos (locale, e.g. en-US)
        #[arg(short, long, default_value = "en-US")]
        source_lang: String,

        /// Language to dub into (e.g. ru)
        #[arg(short, long, default_value = "ru")]
        target_lang: String,

        /// Number of videos processed concurrently (defaults to the config value)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List supported source and target languages
    Languages,

    /// Check that ffmpeg, whisper-cli, the synthesizer and ollama are reachable
    Check,

    /// Write the default configuration to a file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "redub.toml")]
        output: PathBuf,
    },
}
