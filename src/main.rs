//! Redub - Batch Video Dubbing
//!
//! Command line entry point: loads configuration, sets up logging and runs
//! the requested command.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use redub::cli::{Args, Commands};
use redub::config::Config;
use redub::job::JobConfig;
use redub::language::{language_name, SOURCE_LANGUAGES, TARGET_LANGUAGES};
use redub::media::FfmpegProcessor;
use redub::orchestrator::BatchOrchestrator;
use redub::pipeline::Stages;
use redub::synthesize::CommandSynthesizer;
use redub::transcribe::WhisperCppRecognizer;
use redub::translate::check_ollama_availability;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(|| {
        let local = PathBuf::from("redub.toml");
        local.exists().then_some(local)
    });
    let config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Reject a bad run before the log directory is created
    let job = match &args.command {
        Commands::Run { input_dir, output_dir, source_lang, target_lang, workers, .. } => {
            let job = JobConfig {
                input_directory: input_dir.clone(),
                output_directory: output_dir.clone(),
                source_language: source_lang.clone(),
                target_language: target_lang.clone(),
                worker_count: workers.unwrap_or(config.job.workers),
            };
            job.validate()?;
            Some(job)
        }
        _ => None,
    };

    setup_logging(args.verbose)?;
    if let Some(path) = &config_path {
        info!("Loaded configuration from {}", path.display());
    }

    match args.command {
        Commands::Run { report, .. } => {
            let Some(job) = job else {
                anyhow::bail!("run command without a job");
            };

            let stages = Stages::from_config(&config)?;
            let orchestrator = BatchOrchestrator::new(job, stages)?
                .with_progress(progress_bar());

            info!("Dubbing videos in {} from {} to {}",
                  orchestrator.job().input_directory.display(),
                  orchestrator.job().source_language,
                  orchestrator.job().target_language);

            let run_report = orchestrator.run().await?;
            println!("{}", run_report);

            if let Some(report_path) = report {
                run_report.write_json(&report_path)?;
                info!("Run report written to {}", report_path.display());
            }
        }
        Commands::Languages => {
            println!("\nSource languages:");
            for code in SOURCE_LANGUAGES {
                println!("  {:<8} {}", code, language_name(code));
            }
            println!("\nTarget languages:");
            for code in TARGET_LANGUAGES {
                println!("  {:<8} {}", code, language_name(code));
            }
        }
        Commands::Check => {
            FfmpegProcessor::new(config.media.clone()).check_availability().await?;
            WhisperCppRecognizer::new(config.recognizer.clone()).check_availability().await?;
            CommandSynthesizer::new(config.synthesis.clone()).check_availability().await?;
            check_ollama_availability(&config.translate.endpoint, &config.translate.model).await?;
            println!("All external tools are available");
        }
        Commands::InitConfig { output } => {
            config.save_to_file(&output)?;
            println!("Configuration written to {}", output.display());
        }
    }

    Ok(())
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} videos") {
        bar.set_style(style);
    }
    bar
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".redub").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "redub.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("redub.log").display());

    Ok(())
}
