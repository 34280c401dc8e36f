use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;
use crate::job::{JobConfig, VideoItem};
use crate::pipeline::ItemOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Primary,
    RetryUnrecognized,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Primary => write!(f, "primary pass"),
            Pass::RetryUnrecognized => write!(f, "retry pass"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedItem {
    pub item: VideoItem,
    pub output: PathBuf,
    pub pass: Pass,
    pub recognition_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub item: VideoItem,
    pub stage: String,
    pub error: String,
    pub pass: Pass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedItem {
    pub item: VideoItem,
    pub attempts: u32,
    pub last_error: String,
}

/// Outcomes of one sweep of the worker pool
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub pass: Pass,
    pub completed: Vec<CompletedItem>,
    pub failed: Vec<FailedItem>,
    pub unrecognized: Vec<UnrecognizedItem>,
}

impl PassReport {
    pub fn new(pass: Pass) -> Self {
        Self {
            pass,
            completed: Vec::new(),
            failed: Vec::new(),
            unrecognized: Vec::new(),
        }
    }

    pub fn record(&mut self, item: VideoItem, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Completed { output, recognition_attempts } => {
                self.completed.push(CompletedItem { item, output, pass: self.pass, recognition_attempts });
            }
            ItemOutcome::Unrecognized { attempts, last_error } => {
                self.unrecognized.push(UnrecognizedItem { item, attempts, last_error: last_error.to_string() });
            }
            ItemOutcome::Failed(e) => {
                self.failed.push(FailedItem {
                    item,
                    stage: e.stage().to_string(),
                    error: e.to_string(),
                    pass: self.pass,
                });
            }
        }
    }

    /// The unrecognized set of this pass, input of the retry pass
    pub fn unrecognized_items(&self) -> Vec<VideoItem> {
        self.unrecognized.iter().map(|u| u.item.clone()).collect()
    }

    pub fn processed(&self) -> usize {
        self.completed.len() + self.failed.len() + self.unrecognized.len()
    }
}

/// Final summary of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub source_language: String,
    pub target_language: String,
    pub worker_count: usize,
    pub discovered: usize,
    pub succeeded: Vec<CompletedItem>,
    pub failed: Vec<FailedItem>,
    pub permanently_unrecognized: Vec<UnrecognizedItem>,
}

impl RunReport {
    pub fn new(job: &JobConfig, started_at: DateTime<Utc>, discovered: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: None,
            source_language: job.source_language.clone(),
            target_language: job.target_language.clone(),
            worker_count: job.worker_count,
            discovered,
            succeeded: Vec::new(),
            failed: Vec::new(),
            permanently_unrecognized: Vec::new(),
        }
    }

    /// Fold a pass into the run; hands back that pass's unrecognized items
    pub fn absorb(&mut self, pass: PassReport) -> Vec<UnrecognizedItem> {
        self.succeeded.extend(pass.completed);
        self.failed.extend(pass.failed);
        pass.unrecognized
    }

    pub fn finish(&mut self, permanently_unrecognized: Vec<UnrecognizedItem>) {
        self.permanently_unrecognized = permanently_unrecognized;
        self.finished_at = Some(Utc::now());
    }

    /// Items that only succeeded in the retry pass
    pub fn recovered(&self) -> usize {
        self.succeeded
            .iter()
            .filter(|c| c.pass == Pass::RetryUnrecognized)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.permanently_unrecognized.is_empty()
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {} ({} -> {})", self.run_id, self.source_language, self.target_language)?;
        writeln!(f, "  Discovered:                {}", self.discovered)?;
        writeln!(f, "  Succeeded:                 {} ({} after retry pass)", self.succeeded.len(), self.recovered())?;
        writeln!(f, "  Failed:                    {}", self.failed.len())?;
        write!(f, "  Permanently unrecognized:  {}", self.permanently_unrecognized.len())?;

        for failed in &self.failed {
            write!(f, "\n  [failed:{}] {}: {}", failed.stage, failed.item.relative_path.display(), failed.error)?;
        }
        for unrecognized in &self.permanently_unrecognized {
            write!(f, "\n  [unrecognized] {}", unrecognized.item.relative_path.display())?;
        }

        Ok(())
    }
}
