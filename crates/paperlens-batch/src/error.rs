use std::path::PathBuf;

use thiserror::Error;

use paperlens_model::{BatchSummary, JobError};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read batch config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse batch config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid batch configuration: {message}")]
    InvalidConfig { message: String },

    /// A job failed while `continue_on_error` was off.
    ///
    /// Carries the partial summary so completed work is not lost.
    #[error("batch aborted after job {job_id} failed: {source}")]
    Aborted {
        job_id: u64,
        #[source]
        source: JobError,
        summary: Box<BatchSummary>,
    },
}

pub type Result<T> = std::result::Result<T, BatchError>;
