use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, warn};

use paperlens_batch::{AlwaysContinue, BatchConfig, BatchError, Checkpoint, TaskScheduler};
use paperlens_ingest::{PdfExtractor, TextExtractor, scan_pdf_directory};
use paperlens_model::{BatchSummary, DocumentSource, Job};
use paperlens_report::{Locale, ReportBuilder, write_batch_outputs};
use paperlens_rules::RuleSet;

use crate::cli::{AnalyzeArgs, BatchArgs, RulesArgs};
use crate::progress::{ProgressObserver, StdinCheckpoint};
use crate::summary::print_rules;
use crate::types::{AnalyzeOutcome, BatchOutcome};

/// Loads the rule file when given, the embedded defaults otherwise.
pub fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    let rules = match path {
        Some(path) => {
            RuleSet::load(path).with_context(|| format!("load rules from {}", path.display()))?
        }
        None => RuleSet::builtin().context("load built-in rules")?,
    };
    debug!(patterns = rules.pattern_count(), "rules loaded");
    Ok(rules)
}

/// Merges the optional config file with command-line overrides.
pub fn batch_config(args: &BatchArgs) -> Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => BatchConfig::load(path)
            .with_context(|| format!("load batch config from {}", path.display()))?,
        None => BatchConfig::default(),
    };
    if let Some(workers) = args.workers {
        config.worker_count = workers;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }
    if args.stop_on_error {
        config.continue_on_error = false;
    }
    if args.save_intermediate {
        config.save_intermediate = true;
    }
    if let Some(size) = args.sub_batch_size {
        config.sub_batch_size = Some(size);
    }
    if let Some(locale) = args.locale {
        config.locale = locale.into();
    }
    if args.no_outputs {
        config.write_outputs = false;
    }
    if args.output_dir.is_some() {
        config.output_dir.clone_from(&args.output_dir);
    } else if config.output_dir.is_none() {
        config.output_dir = Some(args.dir.join("output"));
    }
    config.validate().context("invalid batch options")?;
    if args.interactive && config.sub_batch_size.is_none() {
        warn!("--interactive has no effect without a sub-batch size");
    }
    Ok(config)
}

pub fn run_batch(args: &BatchArgs) -> Result<BatchOutcome> {
    let span = info_span!("batch_command", dir = %args.dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let config = batch_config(args)?;
    let rules = Arc::new(load_rules(args.rules.as_deref())?);
    let sources = scan_pdf_directory(&args.dir)
        .with_context(|| format!("scan {}", args.dir.display()))?;
    if sources.is_empty() {
        warn!(dir = %args.dir.display(), "no PDF files found");
    }
    info!(documents = sources.len(), workers = config.worker_count, "discovered PDFs");

    let observer = Arc::new(ProgressObserver::new(!sources.is_empty()));
    let checkpoint: Box<dyn Checkpoint> = if args.interactive {
        Box::new(StdinCheckpoint::new(observer.bar()))
    } else {
        Box::new(AlwaysContinue)
    };
    let scheduler = TaskScheduler::new(config.clone(), rules, Arc::new(PdfExtractor))
        .context("create scheduler")?
        .with_observer(observer.clone())
        .with_checkpoint(checkpoint);
    scheduler.enqueue_all(sources);

    let (summary, aborted) = match scheduler.run(config.worker_count) {
        Ok(summary) => (summary, None),
        Err(BatchError::Aborted {
            job_id,
            source,
            summary,
        }) => (*summary, Some(format!("job {job_id} failed: {source}"))),
        Err(error) => return Err(error).context("run batch"),
    };
    observer.finish(&format!(
        "{} succeeded, {} failed",
        summary.succeeded, summary.failed
    ));

    let output_dir = config.output_dir.clone().filter(|_| config.write_outputs);
    let report_files = match &output_dir {
        Some(dir) => write_batch_outputs(dir, &summary, config.locale)
            .with_context(|| format!("write batch report to {}", dir.display()))?,
        None => Vec::new(),
    };

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        duration_ms = start.elapsed().as_millis() as u64,
        "batch command complete"
    );
    Ok(BatchOutcome {
        summary,
        output_dir,
        report_files,
        aborted,
    })
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeOutcome> {
    let span = info_span!("analyze_command", pdf = %args.pdf.display());
    let _guard = span.enter();

    let locale: Locale = args.locale.into();
    let config = BatchConfig::default()
        .with_worker_count(1)
        .with_max_retries(0)
        .with_locale(locale)
        .with_output_dir(args.output_dir.clone());
    let rules = Arc::new(load_rules(args.rules.as_deref())?);
    let extractor = Arc::new(PdfExtractor);
    let scheduler =
        TaskScheduler::new(config, rules, extractor.clone()).context("create scheduler")?;
    scheduler.enqueue(document_source(&args.pdf));

    let summary = scheduler.run(1).context("analyze document")?;
    let job = single_job(summary)?;
    let markdown = job
        .analysis
        .as_ref()
        .map(|analysis| ReportBuilder::new(locale).render(analysis));
    let sections = if args.sections && markdown.is_some() {
        Some(
            extractor
                .extract_sections(&job.document.path)
                .context("parse sections")?,
        )
    } else {
        None
    };
    Ok(AnalyzeOutcome {
        job,
        markdown,
        sections,
    })
}

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref())?;
    if args.dump {
        let toml = toml::to_string_pretty(&rules.to_rule_file()).context("serialize rules")?;
        println!("{toml}");
    } else {
        if let Some(path) = &args.rules {
            println!("Rule file is valid: {}", path.display());
        }
        print_rules(&rules);
    }
    Ok(())
}

fn document_source(path: &Path) -> DocumentSource {
    let mut source = DocumentSource::from_path(PathBuf::from(path));
    if let Ok(metadata) = std::fs::metadata(path) {
        source.size_bytes = Some(metadata.len());
        source.modified = metadata.modified().ok().map(Into::into);
    }
    source
}

fn single_job(summary: BatchSummary) -> Result<Job> {
    match summary.jobs.into_iter().next() {
        Some(job) => Ok(job),
        None => bail!("document was not processed"),
    }
}
