//! The per-document step sequence.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use paperlens_analyze::{classify, extract_innovation, extract_paper_info, normalize};
use paperlens_ingest::{TextExtractor, validate_pdf};
use paperlens_model::{
    DocumentSource, Job, JobError, PaperAnalysis, StepName, StepRecord, StepStatus,
};
use paperlens_report::{IntermediateText, OutputError, ReportBuilder, write_paper_outputs};
use paperlens_rules::RuleSet;

use crate::config::BatchConfig;

/// Result of one successful attempt.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub analysis: PaperAnalysis,
    pub outputs: Vec<PathBuf>,
}

/// Runs validate, extract, normalize, the three extractors, report
/// building, and output writing for one job attempt.
pub struct Pipeline {
    rules: Arc<RuleSet>,
    extractor: Arc<dyn TextExtractor>,
    builder: ReportBuilder,
    output_dir: Option<PathBuf>,
    save_intermediate: bool,
}

impl Pipeline {
    pub fn new(
        config: &BatchConfig,
        rules: Arc<RuleSet>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            rules,
            extractor,
            builder: ReportBuilder::new(config.locale),
            output_dir: config.paper_output_dir().map(PathBuf::from),
            save_intermediate: config.save_intermediate,
        }
    }

    /// Executes every step in order, recording each on the job.
    ///
    /// Stops at the first failing step.
    pub fn run(&self, job: &mut Job, attempt: u32) -> Result<PipelineOutput, JobError> {
        let job_id = job.id;
        let source = job.document.clone();

        let resolved = step(job, attempt, StepName::Validate, || {
            validate_pdf(&source.path).map_err(JobError::from)
        })?;
        let raw = step(job, attempt, StepName::Extract, || {
            self.extractor.extract_text(&resolved).map_err(JobError::from)
        })?;
        let text = step(job, attempt, StepName::Normalize, || Ok(normalize(&raw)))?;
        let info = step(job, attempt, StepName::ExtractInfo, || {
            Ok(extract_paper_info(&text))
        })?;
        let verdict = step(job, attempt, StepName::Classify, || {
            Ok(classify(&text, &self.rules))
        })?;
        let innovation = step(job, attempt, StepName::Innovation, || {
            Ok(extract_innovation(&text, &self.rules))
        })?;

        let document = DocumentSource {
            path: resolved,
            ..source
        };
        let report = step(job, attempt, StepName::BuildReport, || {
            Ok(self
                .builder
                .build(&document, info, verdict, innovation, Utc::now()))
        })?;

        let outputs = match &self.output_dir {
            Some(dir) => step(job, attempt, StepName::WriteOutputs, || {
                let intermediate = self.save_intermediate.then_some(IntermediateText {
                    extracted: &raw,
                    normalized: &text,
                });
                write_paper_outputs(dir, job_id, &report, intermediate).map_err(output_error)
            })?,
            None => Vec::new(),
        };

        Ok(PipelineOutput {
            analysis: report.analysis,
            outputs,
        })
    }
}

fn step<T>(
    job: &mut Job,
    attempt: u32,
    name: StepName,
    run: impl FnOnce() -> Result<T, JobError>,
) -> Result<T, JobError> {
    let started = Instant::now();
    let result = run();
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let error = result.as_ref().err().map(ToString::to_string);
    debug!(
        step = %name,
        attempt,
        duration_ms,
        ok = error.is_none(),
        "step finished"
    );
    job.record_step(StepRecord {
        name,
        status: if error.is_none() {
            StepStatus::Success
        } else {
            StepStatus::Failed
        },
        attempt,
        duration_ms,
        error,
    });
    result
}

fn output_error(error: OutputError) -> JobError {
    let path = error.path().to_path_buf();
    let message = match error {
        OutputError::Io { source, .. } => source.to_string(),
        OutputError::Json { source, .. } => source.to_string(),
    };
    JobError::Output { path, message }
}
