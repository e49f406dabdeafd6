//! Batch-level aggregation of job outcomes.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::ImplementationKind;
use crate::job::{Job, JobStatus};

/// Aggregate result of one scheduler run, built once after all workers join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Every document enqueued for the run.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Terminal jobs ordered by id.
    pub jobs: Vec<Job>,
    /// Jobs never dispatched because the run stopped early, ordered by id.
    /// Each keeps its pending status and the reason it was skipped.
    #[serde(default)]
    pub skipped: Vec<Job>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A failed document with its captured cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    pub id: u64,
    pub document: String,
    pub path: PathBuf,
    pub error: String,
    pub attempts: u32,
}

/// Distribution of implementation kinds over successful jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindStats {
    pub official: usize,
    pub unofficial: usize,
    pub unknown: usize,
}

impl KindStats {
    pub fn count(&self, kind: ImplementationKind) -> usize {
        match kind {
            ImplementationKind::Official => self.official,
            ImplementationKind::Unofficial => self.unofficial,
            ImplementationKind::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.official + self.unofficial + self.unknown
    }

    /// Share of `kind` in percent, 0 when nothing was classified.
    pub fn percentage(&self, kind: ImplementationKind) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(kind) as f64 * 100.0 / total as f64
    }
}

impl BatchSummary {
    pub fn from_jobs(
        mut jobs: Vec<Job>,
        mut skipped: Vec<Job>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        jobs.sort_by_key(|job| job.id);
        skipped.sort_by_key(|job| job.id);
        let succeeded = jobs
            .iter()
            .filter(|job| job.status == JobStatus::Success)
            .count();
        let failed = jobs
            .iter()
            .filter(|job| job.status == JobStatus::Failed)
            .count();
        Self {
            total: jobs.len() + skipped.len(),
            succeeded,
            failed,
            jobs,
            skipped,
            started_at,
            finished_at,
        }
    }

    /// Success rate in percent of all enqueued documents.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded as f64 * 100.0 / self.total as f64
    }

    pub fn total_duration_ms(&self) -> u64 {
        u64::try_from((self.finished_at - self.started_at).num_milliseconds()).unwrap_or(0)
    }

    /// Mean wall time of successful jobs.
    pub fn average_duration_ms(&self) -> Option<f64> {
        let durations: Vec<u64> = self
            .jobs
            .iter()
            .filter(|job| job.status == JobStatus::Success)
            .filter_map(Job::duration_ms)
            .collect();
        if durations.is_empty() {
            return None;
        }
        Some(durations.iter().sum::<u64>() as f64 / durations.len() as f64)
    }

    pub fn kind_stats(&self) -> KindStats {
        let mut stats = KindStats::default();
        for analysis in self.jobs.iter().filter_map(|job| job.analysis.as_ref()) {
            match analysis.implementation.kind {
                ImplementationKind::Official => stats.official += 1,
                ImplementationKind::Unofficial => stats.unofficial += 1,
                ImplementationKind::Unknown => stats.unknown += 1,
            }
        }
        stats
    }

    pub fn failures(&self) -> Vec<FailedJob> {
        self.jobs
            .iter()
            .filter(|job| job.status == JobStatus::Failed)
            .map(|job| FailedJob {
                id: job.id,
                document: job.document.title.clone(),
                path: job.document.path.clone(),
                error: job.error.clone().unwrap_or_default(),
                attempts: job.attempts,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
