//! Job lifecycle and step audit trail.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::PaperAnalysis;
use crate::error::JobError;

const SKIPPED_KIND: &str = "skipped";

/// A document queued for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub path: PathBuf,
    /// Display title, the file stem unless the caller knows better.
    pub title: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub modified: Option<DateTime<Local>>,
}

impl DocumentSource {
    /// Builds a source from a bare path without touching the filesystem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = file_stem_label(&path);
        Self {
            path,
            title,
            size_bytes: None,
            modified: None,
        }
    }

    pub fn size_mb(&self) -> Option<f64> {
        self.size_bytes.map(|bytes| bytes as f64 / (1024.0 * 1024.0))
    }
}

fn file_stem_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Success,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    Validate,
    Extract,
    Normalize,
    ExtractInfo,
    Classify,
    Innovation,
    BuildReport,
    WriteOutputs,
}

impl StepName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Extract => "extract",
            Self::Normalize => "normalize",
            Self::ExtractInfo => "extract_info",
            Self::Classify => "classify",
            Self::Innovation => "innovation",
            Self::BuildReport => "build_report",
            Self::WriteOutputs => "write_outputs",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
}

/// One executed step, kept in execution order across all attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: StepName,
    pub status: StepStatus,
    /// 1-based attempt number the step ran under.
    pub attempt: u32,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One document's pass through the pipeline.
///
/// Status only moves forward: `pending -> running -> success | failed`.
/// Calls that would leave a terminal state are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub document: DocumentSource,
    pub status: JobStatus,
    pub steps: Vec<StepRecord>,
    /// Number of attempts started, including the first.
    pub attempts: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PaperAnalysis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<PathBuf>,
}

impl Job {
    pub fn new(id: u64, document: DocumentSource) -> Self {
        Self {
            id,
            document,
            status: JobStatus::Pending,
            steps: Vec::new(),
            attempts: 0,
            started_at: None,
            finished_at: None,
            error: None,
            error_kind: None,
            analysis: None,
            outputs: Vec::new(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.document.path
    }

    pub fn start(&mut self, at: DateTime<Utc>) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Running;
            self.started_at = Some(at);
        }
    }

    /// Opens a new attempt and returns its 1-based number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub fn record_step(&mut self, record: StepRecord) {
        if !self.status.is_terminal() {
            self.steps.push(record);
        }
    }

    pub fn succeed(&mut self, analysis: PaperAnalysis, at: DateTime<Utc>) {
        if self.status == JobStatus::Running {
            self.status = JobStatus::Success;
            self.analysis = Some(analysis);
            self.error = None;
            self.error_kind = None;
            self.finished_at = Some(at);
        }
    }

    pub fn fail(&mut self, error: &JobError, at: DateTime<Utc>) {
        if self.status == JobStatus::Running {
            self.status = JobStatus::Failed;
            self.error = Some(error.to_string());
            self.error_kind = Some(error.kind().to_string());
            self.finished_at = Some(at);
        }
    }

    /// Marks a never-dispatched job with the reason it was left behind.
    /// Status stays `pending`.
    pub fn skip(&mut self, reason: impl Into<String>) {
        if self.status == JobStatus::Pending {
            self.error = Some(reason.into());
            self.error_kind = Some(SKIPPED_KIND.to_string());
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.status == JobStatus::Pending && self.error_kind.as_deref() == Some(SKIPPED_KIND)
    }

    /// Retries used beyond the first attempt.
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => u64::try_from((end - start).num_milliseconds()).ok(),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ImplementationVerdict, InnovationFindings, PaperInfo};

    fn analysis() -> PaperAnalysis {
        PaperAnalysis {
            document: "paper".to_string(),
            source: PathBuf::from("paper.pdf"),
            analyzed_at: Utc::now(),
            paper_info: PaperInfo::default(),
            implementation: ImplementationVerdict::default(),
            innovation: InnovationFindings::default(),
        }
    }

    #[test]
    fn document_title_defaults_to_stem() {
        let source = DocumentSource::from_path("/papers/Attention Is All You Need.pdf");
        assert_eq!(source.title, "Attention Is All You Need");
        assert!(source.size_mb().is_none());
    }

    #[test]
    fn job_moves_forward_only() {
        let mut job = Job::new(0, DocumentSource::from_path("a.pdf"));
        job.succeed(analysis(), Utc::now());
        assert_eq!(job.status, JobStatus::Pending);

        job.start(Utc::now());
        assert_eq!(job.status, JobStatus::Running);
        job.succeed(analysis(), Utc::now());
        assert_eq!(job.status, JobStatus::Success);

        let error = JobError::Extraction {
            path: PathBuf::from("a.pdf"),
            message: "boom".to_string(),
        };
        job.fail(&error, Utc::now());
        assert_eq!(job.status, JobStatus::Success);
        assert!(job.error.is_none());
    }

    #[test]
    fn failed_job_keeps_error_and_retry_count() {
        let mut job = Job::new(3, DocumentSource::from_path("missing.pdf"));
        job.start(Utc::now());
        job.begin_attempt();
        job.begin_attempt();
        let error = JobError::Extraction {
            path: PathBuf::from("missing.pdf"),
            message: "truncated stream".to_string(),
        };
        job.fail(&error, Utc::now());
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.retries(), 1);
        assert_eq!(job.error_kind.as_deref(), Some("extraction"));
        assert!(job.error.as_deref().unwrap_or_default().contains("truncated stream"));
    }

    #[test]
    fn skipped_job_keeps_id_and_reason() {
        let mut job = Job::new(4, DocumentSource::from_path("late.pdf"));
        job.skip("stopped at checkpoint");
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.is_skipped());
        assert_eq!(job.error.as_deref(), Some("stopped at checkpoint"));

        let mut running = Job::new(5, DocumentSource::from_path("busy.pdf"));
        running.start(Utc::now());
        running.skip("run aborted");
        assert!(!running.is_skipped());
        assert!(running.error.is_none());
    }

    #[test]
    fn steps_are_not_recorded_after_terminal_state() {
        let mut job = Job::new(1, DocumentSource::from_path("b.pdf"));
        job.start(Utc::now());
        job.record_step(StepRecord {
            name: StepName::Validate,
            status: StepStatus::Success,
            attempt: 1,
            duration_ms: 0,
            error: None,
        });
        job.succeed(analysis(), Utc::now());
        job.record_step(StepRecord {
            name: StepName::Extract,
            status: StepStatus::Success,
            attempt: 1,
            duration_ms: 0,
            error: None,
        });
        assert_eq!(job.steps.len(), 1);
    }
}
