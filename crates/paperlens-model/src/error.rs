use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single job step, captured at the job boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobError {
    /// Source document missing, unreadable, or not a PDF.
    #[error("validation failed for {path}: {reason}")]
    Validation { path: PathBuf, reason: String },

    /// The text extraction collaborator failed.
    #[error("text extraction failed for {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    /// Writing a per-document output failed.
    #[error("failed to write output {path}: {message}")]
    Output { path: PathBuf, message: String },
}

impl JobError {
    /// Whether re-running the step sequence could plausibly succeed.
    ///
    /// A document that failed validation will not appear between attempts.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Validation { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Extraction { .. } => "extraction",
            Self::Output { .. } => "output",
        }
    }
}

pub type Result<T> = std::result::Result<T, JobError>;
