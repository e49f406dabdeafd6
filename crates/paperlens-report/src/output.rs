//! Persisting reports and analysis records to disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use paperlens_model::BatchSummary;

use crate::batch::render_batch_markdown;
use crate::locale::Locale;
use crate::paper::PaperReport;

pub const ANALYSIS_JSON: &str = "analysis_results.json";
pub const ANALYSIS_MARKDOWN: &str = "analysis_report.md";
pub const EXTRACTED_TEXT: &str = "extracted_text.txt";
pub const NORMALIZED_TEXT: &str = "normalized_text.txt";
pub const BATCH_JSON: &str = "batch_results.json";
pub const BATCH_MARKDOWN: &str = "batch_report.md";

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl OutputError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// Raw and normalized text kept alongside a paper's outputs.
#[derive(Debug, Clone, Copy)]
pub struct IntermediateText<'a> {
    pub extracted: &'a str,
    pub normalized: &'a str,
}

/// Directory name of one paper's outputs. The job id prefix keeps
/// documents with the same title apart.
pub fn paper_dir_name(job_id: u64, document: &str) -> String {
    format!("{job_id:04}_{document}")
}

/// Writes `<output_dir>/<id>_<document>/` with the JSON record, the Markdown
/// report, and optionally the intermediate texts.
pub fn write_paper_outputs(
    output_dir: &Path,
    job_id: u64,
    report: &PaperReport,
    intermediate: Option<IntermediateText<'_>>,
) -> Result<Vec<PathBuf>> {
    let dir = output_dir.join(paper_dir_name(job_id, &report.analysis.document));
    create_dir(&dir)?;
    let mut written = vec![
        write_json(&dir.join(ANALYSIS_JSON), &report.analysis)?,
        write_text(&dir.join(ANALYSIS_MARKDOWN), &report.markdown)?,
    ];
    if let Some(texts) = intermediate {
        written.push(write_text(&dir.join(EXTRACTED_TEXT), texts.extracted)?);
        written.push(write_text(&dir.join(NORMALIZED_TEXT), texts.normalized)?);
    }
    debug!(dir = %dir.display(), files = written.len(), "wrote paper outputs");
    Ok(written)
}

/// Writes the batch JSON record and Markdown report into `output_dir`.
pub fn write_batch_outputs(
    output_dir: &Path,
    summary: &BatchSummary,
    locale: Locale,
) -> Result<Vec<PathBuf>> {
    create_dir(output_dir)?;
    Ok(vec![
        write_json(&output_dir.join(BATCH_JSON), summary)?,
        write_text(
            &output_dir.join(BATCH_MARKDOWN),
            &render_batch_markdown(summary, locale),
        )?,
    ])
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(value).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_text(path, &json)
}

fn write_text(path: &Path, content: &str) -> Result<PathBuf> {
    fs::write(path, content).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}
