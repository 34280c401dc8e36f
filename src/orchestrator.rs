//! Batch orchestration.
//!
//! A run validates the job, discovers videos, sweeps them through a bounded
//! pool of pipeline workers, and then sweeps the items whose speech could not
//! be recognized exactly once more.

use chrono::Utc;
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{Result, RedubError, StageError};
use crate::job::{is_video_file, translated_suffix, JobConfig, VideoItem};
use crate::pipeline::{ItemOutcome, ItemPipeline, Stages};
use crate::report::{Pass, PassReport, RunReport};

pub struct BatchOrchestrator {
    job: JobConfig,
    pipeline: Arc<ItemPipeline>,
    progress: ProgressBar,
}

impl BatchOrchestrator {
    /// Validates the job before anything touches the filesystem
    pub fn new(job: JobConfig, stages: Stages) -> Result<Self> {
        job.validate()?;
        let pipeline = Arc::new(ItemPipeline::new(stages, &job));

        Ok(Self {
            job,
            pipeline,
            progress: ProgressBar::hidden(),
        })
    }

    /// Report per-item progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn job(&self) -> &JobConfig {
        &self.job
    }

    /// Discover, primary pass, retry pass for unrecognized items, report
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();

        self.prepare_directories().await?;
        let items = self.discover()?;
        info!("Found {} video files to process", items.len());

        let mut report = RunReport::new(&self.job, started_at, items.len());
        self.progress.set_length(items.len() as u64);

        let primary = self.run_pass(Pass::Primary, items).await;
        let unrecognized = report.absorb(primary);

        let permanently_unrecognized = if unrecognized.is_empty() {
            unrecognized
        } else {
            info!("Retrying {} videos whose speech was not recognized", unrecognized.len());
            let retry_items = unrecognized.into_iter().map(|u| u.item).collect::<Vec<_>>();
            self.progress.inc_length(retry_items.len() as u64);

            let retry = self.run_pass(Pass::RetryUnrecognized, retry_items).await;
            report.absorb(retry)
        };

        for unrecognized in &permanently_unrecognized {
            warn!("Permanently unrecognized: {}", unrecognized.item.relative_path.display());
        }

        report.finish(permanently_unrecognized);
        self.progress.finish_and_clear();

        info!("Run {} finished: {} succeeded, {} failed, {} permanently unrecognized",
              report.run_id, report.succeeded.len(), report.failed.len(),
              report.permanently_unrecognized.len());

        Ok(report)
    }

    async fn prepare_directories(&self) -> Result<()> {
        let input = &self.job.input_directory;
        if !input.is_dir() {
            return Err(RedubError::Config(format!(
                "Input path is not a directory: {}",
                input.display()
            )));
        }

        fs::create_dir_all(&self.job.output_directory).await?;
        Ok(())
    }

    /// Videos directly inside the input directory, sorted by path
    pub fn discover(&self) -> Result<Vec<VideoItem>> {
        let items = discover_videos(&self.job.input_directory, &self.job.target_language)?;

        if items.is_empty() {
            return Err(RedubError::EmptyInput(self.job.input_directory.clone()));
        }

        Ok(items)
    }

    /// Run one pipeline per item, at most `worker_count` at a time
    pub async fn run_pass(&self, pass: Pass, items: Vec<VideoItem>) -> PassReport {
        info!("Starting {} over {} videos with {} workers", pass, items.len(), self.job.worker_count);

        let semaphore = Arc::new(Semaphore::new(self.job.worker_count));
        let mut workers = JoinSet::new();
        let mut in_flight = HashMap::new();
        let mut report = PassReport::new(pass);

        for item in items {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    report.record(item, ItemOutcome::Failed(StageError::Worker(e.to_string())));
                    continue;
                }
            };

            let pipeline = Arc::clone(&self.pipeline);
            let task_item = item.clone();
            let handle = workers.spawn(async move {
                let outcome = pipeline.process(&task_item).await;
                drop(permit);
                outcome
            });
            in_flight.insert(handle.id(), item);
        }

        while let Some(joined) = workers.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => {
                    warn!("Worker task ended abnormally: {}", e);
                    (e.id(), ItemOutcome::Failed(StageError::Worker(e.to_string())))
                }
            };

            if let Some(item) = in_flight.remove(&id) {
                report.record(item, outcome);
            }
            self.progress.inc(1);
        }

        info!("Finished {}: {} processed, {} completed, {} failed, {} unrecognized",
              pass, report.processed(), report.completed.len(), report.failed.len(),
              report.unrecognized.len());
        report
    }
}

/// List recognized video files in `input_directory`, skipping earlier outputs
/// for `target_language` so an output directory equal to the input stays idempotent
pub fn discover_videos(input_directory: &Path, target_language: &str) -> Result<Vec<VideoItem>> {
    let output_suffix = translated_suffix(target_language);
    let mut items = Vec::new();

    for entry in WalkDir::new(input_directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() || !is_video_file(entry.path()) {
            continue;
        }

        let item = VideoItem::new(entry.into_path(), input_directory);
        if !item.stem().ends_with(&output_suffix) {
            items.push(item);
        }
    }

    items.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_discover_videos_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp4", "a.MKV", "notes.txt", "a.mp4_audio.wav", "a_translated_ru.mkv"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.mp4")).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("deep.mp4"), b"x").unwrap();

        let items = discover_videos(dir.path(), "ru").unwrap();
        let names: Vec<PathBuf> = items.iter().map(|i| i.relative_path.clone()).collect();
        assert_eq!(names, vec![PathBuf::from("a.MKV"), PathBuf::from("b.mp4")]);
    }

    #[test]
    fn test_discover_keeps_outputs_of_other_languages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_translated_de.mp4"), b"x").unwrap();

        assert_eq!(discover_videos(dir.path(), "ru").unwrap().len(), 1);
        assert!(discover_videos(dir.path(), "de").unwrap().is_empty());
    }

    #[test]
    fn test_discover_reports_unreadable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_videos(&dir.path().join("gone"), "ru").unwrap_err();
        assert!(matches!(err, RedubError::Io(_)));
    }
}
