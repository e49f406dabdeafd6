//! Batch run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use paperlens_report::Locale;

use crate::error::{BatchError, Result};

/// Immutable options for one scheduler run.
///
/// Every field has a default so a partial TOML file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Number of parallel workers.
    pub worker_count: usize,
    /// Additional attempts after the first failure of a job.
    pub max_retries: u32,
    /// Skip failed jobs instead of aborting the run.
    pub continue_on_error: bool,
    /// Keep raw and normalized text next to each paper's outputs.
    pub save_intermediate: bool,
    /// Pause for the checkpoint after every this many jobs.
    pub sub_batch_size: Option<usize>,
    /// Where per-paper outputs go. Nothing is written when unset.
    pub output_dir: Option<PathBuf>,
    pub locale: Locale,
    /// Write per-paper JSON and Markdown when `output_dir` is set.
    pub write_outputs: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            worker_count: 2,
            max_retries: 1,
            continue_on_error: true,
            save_intermediate: false,
            sub_batch_size: None,
            output_dir: None,
            locale: Locale::default(),
            write_outputs: true,
        }
    }
}

impl BatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BatchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| BatchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(BatchError::InvalidConfig {
                message: "worker_count must be at least 1".to_string(),
            });
        }
        if self.sub_batch_size == Some(0) {
            return Err(BatchError::InvalidConfig {
                message: "sub_batch_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Directory for per-paper outputs, if any are to be written.
    pub fn paper_output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref().filter(|_| self.write_outputs)
    }

    /// Attempts allowed per job, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_continue_on_error(mut self, enable: bool) -> Self {
        self.continue_on_error = enable;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    #[must_use]
    pub fn with_save_intermediate(mut self, enable: bool) -> Self {
        self.save_intermediate = enable;
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_sub_batch_size(mut self, size: Option<usize>) -> Self {
        self.sub_batch_size = size;
        self
    }
}
