use std::path::PathBuf;

use paperlens_ingest::PaperSections;
use paperlens_model::{BatchSummary, Job};

/// Outcome of the `batch` command.
#[derive(Debug)]
pub struct BatchOutcome {
    pub summary: BatchSummary,
    pub output_dir: Option<PathBuf>,
    /// Batch-level JSON and Markdown files, when written.
    pub report_files: Vec<PathBuf>,
    /// Cause of an aborted run.
    pub aborted: Option<String>,
}

impl BatchOutcome {
    pub fn has_errors(&self) -> bool {
        self.aborted.is_some() || self.summary.has_failures()
    }
}

/// Outcome of the `analyze` command.
#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub job: Job,
    /// Rendered report of a successful analysis.
    pub markdown: Option<String>,
    pub sections: Option<PaperSections>,
}

impl AnalyzeOutcome {
    pub fn has_errors(&self) -> bool {
        self.markdown.is_none()
    }
}
