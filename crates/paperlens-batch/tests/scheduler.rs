//! Tests for the batch scheduler, driven by an in-memory text extractor.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use tempfile::TempDir;

use paperlens_batch::{BatchConfig, BatchError, BatchObserver, BatchProgress, TaskScheduler};
use paperlens_ingest::{IngestError, TextExtractor};
use paperlens_model::{
    Confidence, DocumentSource, ImplementationKind, Job, JobStatus, StepName, StepStatus,
};
use paperlens_rules::RuleSet;

const PAPER_TEXT: &str = "Graph Search at Scale\n\n\
Ada Lovelace, Alan Turing\n\n\
We propose a novel graph search method.\n\n\
The official implementation available at https://github.com/x/y\n\n\
The official implementation available at https://github.com/x/y\n\n\
The official implementation available at https://github.com/x/y";

/// Returns the same text for every document, failing the first
/// `failures` calls.
struct FakeExtractor {
    failures: usize,
    calls: AtomicUsize,
}

impl FakeExtractor {
    fn new() -> Self {
        Self::flaky(0)
    }

    fn flaky(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }
}

/// Panics on the document whose path contains `needle`.
struct PanickingExtractor {
    needle: &'static str,
}

impl TextExtractor for PanickingExtractor {
    fn extract_text(&self, path: &Path) -> paperlens_ingest::Result<String> {
        if path.to_string_lossy().contains(self.needle) {
            panic!("parser blew up on {}", path.display());
        }
        Ok(PAPER_TEXT.to_string())
    }
}

impl TextExtractor for FakeExtractor {
    fn extract_text(&self, path: &Path) -> paperlens_ingest::Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(IngestError::Extraction {
                path: path.to_path_buf(),
                message: "simulated parser failure".to_string(),
            });
        }
        Ok(PAPER_TEXT.to_string())
    }
}

#[derive(Default)]
struct CountingObserver {
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl BatchObserver for CountingObserver {
    fn job_started(&self, _job: &Job) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn job_finished(&self, job: &Job) {
        assert!(job.is_terminal());
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

/// Creates `count` PDF stubs named `paper_<i>.pdf`, leaving out `missing`.
fn papers(count: usize, missing: &[usize]) -> (TempDir, Vec<DocumentSource>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let sources = (0..count)
        .map(|i| {
            let path = dir.path().join(format!("paper_{i}.pdf"));
            if !missing.contains(&i) {
                fs::write(&path, b"%PDF-1.4\n").expect("write pdf");
            }
            DocumentSource::from_path(path)
        })
        .collect();
    (dir, sources)
}

fn scheduler(config: BatchConfig, extractor: FakeExtractor) -> TaskScheduler {
    let rules = Arc::new(RuleSet::builtin().expect("built-in rules"));
    TaskScheduler::new(config, rules, Arc::new(extractor)).expect("scheduler")
}

#[test]
fn one_invalid_document_fails_only_its_job() {
    let (_dir, sources) = papers(5, &[3]);
    let scheduler = scheduler(BatchConfig::default(), FakeExtractor::new());
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(2).expect("run");
    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 1);

    let failures = summary.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].id, 3);
    assert_eq!(failures[0].document, "paper_3");
    assert!(failures[0].error.contains("file not found"), "{}", failures[0].error);
    // validation failures are not retried
    assert_eq!(failures[0].attempts, 1);
}

#[test]
fn successful_jobs_carry_the_analysis() {
    let (_dir, sources) = papers(1, &[]);
    let scheduler = scheduler(BatchConfig::default(), FakeExtractor::new());
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(1).expect("run");
    let job = &summary.jobs[0];
    assert_eq!(job.status, JobStatus::Success);
    let analysis = job.analysis.as_ref().expect("analysis");
    assert_eq!(analysis.document, "paper_0");
    assert_eq!(analysis.implementation.kind, ImplementationKind::Official);
    assert_eq!(analysis.implementation.confidence, Confidence::High);
    assert_eq!(
        analysis.implementation.code_url.as_deref(),
        Some("https://github.com/x/y")
    );
    assert_eq!(summary.kind_stats().official, 1);
}

#[test]
fn steps_are_recorded_in_order() {
    let (_dir, sources) = papers(1, &[]);
    let scheduler = scheduler(BatchConfig::default(), FakeExtractor::new());
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(1).expect("run");
    let names: Vec<StepName> = summary.jobs[0].steps.iter().map(|step| step.name).collect();
    assert_eq!(
        names,
        vec![
            StepName::Validate,
            StepName::Extract,
            StepName::Normalize,
            StepName::ExtractInfo,
            StepName::Classify,
            StepName::Innovation,
            StepName::BuildReport,
        ]
    );
}

#[test]
fn failed_step_stops_the_sequence() {
    let (_dir, sources) = papers(1, &[0]);
    let scheduler = scheduler(BatchConfig::default(), FakeExtractor::new());
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(1).expect("run");
    let steps = &summary.jobs[0].steps;
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].name, StepName::Validate);
    assert_eq!(steps[0].status, StepStatus::Failed);
    assert_eq!(summary.jobs[0].error_kind.as_deref(), Some("validation"));
}

#[test]
fn extraction_failure_is_retried() {
    let (_dir, sources) = papers(1, &[]);
    let scheduler = scheduler(BatchConfig::default(), FakeExtractor::flaky(1));
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(1).expect("run");
    let job = &summary.jobs[0];
    assert_eq!(job.status, JobStatus::Success);
    assert_eq!(job.attempts, 2);
    assert_eq!(job.retries(), 1);
    assert_eq!(job.steps[1].name, StepName::Extract);
    assert_eq!(job.steps[1].status, StepStatus::Failed);
    assert_eq!(job.steps[1].attempt, 1);
    assert_eq!(job.steps[2].name, StepName::Validate);
    assert_eq!(job.steps[2].attempt, 2);
}

#[test]
fn exhausted_retries_fail_the_job() {
    let (_dir, sources) = papers(1, &[]);
    let config = BatchConfig::default().with_max_retries(2);
    let scheduler = scheduler(config, FakeExtractor::flaky(usize::MAX));
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(1).expect("run");
    let job = &summary.jobs[0];
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.attempts, 3);
    assert_eq!(job.error_kind.as_deref(), Some("extraction"));
    assert!(job
        .error
        .as_deref()
        .is_some_and(|error| error.contains("simulated parser failure")));
}

#[test]
fn stop_on_error_aborts_with_partial_summary() {
    let (_dir, sources) = papers(4, &[1]);
    let config = BatchConfig::default().with_continue_on_error(false);
    let scheduler = scheduler(config, FakeExtractor::new());
    scheduler.enqueue_all(sources);

    let Err(BatchError::Aborted {
        job_id, summary, ..
    }) = scheduler.run(1)
    else {
        panic!("expected the run to abort");
    };
    assert_eq!(job_id, 1);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    let skipped: Vec<u64> = summary.skipped.iter().map(|job| job.id).collect();
    assert_eq!(skipped, vec![2, 3]);
    assert!(summary
        .skipped
        .iter()
        .all(|job| job.status == JobStatus::Pending && job.error.as_deref() == Some("run aborted")));
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn declined_checkpoint_skips_remaining_documents() {
    let (_dir, sources) = papers(5, &[]);
    let config = BatchConfig::default().with_sub_batch_size(Some(2));
    let asked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&asked);
    let scheduler = scheduler(config, FakeExtractor::new()).with_checkpoint(Box::new(
        move |progress: &BatchProgress| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert_eq!(progress.completed, 2);
            assert_eq!(progress.remaining, 3);
            false
        },
    ));
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(2).expect("run");
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 2);
    let skipped: Vec<(u64, &str)> = summary
        .skipped
        .iter()
        .map(|job| (job.id, job.document.title.as_str()))
        .collect();
    assert_eq!(skipped, vec![(2, "paper_2"), (3, "paper_3"), (4, "paper_4")]);
    assert!(summary.skipped.iter().all(Job::is_skipped));
    assert!(summary
        .skipped
        .iter()
        .all(|job| job.error.as_deref() == Some("stopped at checkpoint")));
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn accepted_checkpoint_runs_every_sub_batch() {
    let (_dir, sources) = papers(5, &[]);
    let config = BatchConfig::default().with_sub_batch_size(Some(2));
    let asked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&asked);
    let scheduler = scheduler(config, FakeExtractor::new()).with_checkpoint(Box::new(
        move |_: &BatchProgress| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        },
    ));
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(2).expect("run");
    // rounds of 2, 2, 1; no question after the last
    assert_eq!(asked.load(Ordering::SeqCst), 2);
    assert_eq!(summary.succeeded, 5);
    assert!(summary.skipped.is_empty());
}

#[test]
fn observer_sees_every_job() {
    let (_dir, sources) = papers(6, &[2]);
    let observer = Arc::new(CountingObserver::default());
    let scheduler =
        scheduler(BatchConfig::default(), FakeExtractor::new()).with_observer(observer.clone());
    scheduler.enqueue_all(sources);

    scheduler.run(3).expect("run");
    assert_eq!(observer.started.load(Ordering::SeqCst), 6);
    assert_eq!(observer.finished.load(Ordering::SeqCst), 6);
}

#[test]
fn outputs_are_written_when_configured() {
    let (_dir, sources) = papers(2, &[]);
    let out = tempfile::tempdir().expect("output dir");
    let config = BatchConfig::default()
        .with_output_dir(Some(out.path().to_path_buf()))
        .with_save_intermediate(true);
    let scheduler = scheduler(config, FakeExtractor::new());
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(2).expect("run");
    for job in &summary.jobs {
        assert_eq!(job.outputs.len(), 4);
        assert_eq!(job.steps.last().map(|step| step.name), Some(StepName::WriteOutputs));
    }
    let record = out.path().join("0001_paper_1").join("analysis_results.json");
    assert!(record.is_file());
    assert!(out.path().join("0001_paper_1").join("normalized_text.txt").is_file());
}

#[test]
fn same_stem_sources_do_not_share_an_output_directory() {
    let (_first, mut sources) = papers(1, &[]);
    let (_second, more) = papers(1, &[]);
    sources.extend(more);
    let out = tempfile::tempdir().expect("output dir");
    let config = BatchConfig::default().with_output_dir(Some(out.path().to_path_buf()));
    let scheduler = scheduler(config, FakeExtractor::new());
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(2).expect("run");
    assert_eq!(summary.succeeded, 2);
    let first = out.path().join("0000_paper_0").join("analysis_results.json");
    let second = out.path().join("0001_paper_0").join("analysis_results.json");
    assert!(first.is_file());
    assert!(second.is_file());
    assert_ne!(summary.jobs[0].outputs, summary.jobs[1].outputs);
}

#[test]
fn panicking_extractor_fails_only_its_job() {
    let (_dir, sources) = papers(3, &[]);
    let rules = Arc::new(RuleSet::builtin().expect("built-in rules"));
    let observer = Arc::new(CountingObserver::default());
    let scheduler = TaskScheduler::new(
        BatchConfig::default(),
        rules,
        Arc::new(PanickingExtractor { needle: "paper_1" }),
    )
    .expect("scheduler")
    .with_observer(observer.clone());
    scheduler.enqueue_all(sources);

    let summary = scheduler.run(1).expect("run");
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(summary.skipped.is_empty());
    assert_eq!(observer.finished.load(Ordering::SeqCst), 3);

    let job = &summary.jobs[1];
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_kind.as_deref(), Some("extraction"));
    assert!(job
        .error
        .as_deref()
        .is_some_and(|error| error.contains("worker panicked")));
}

#[test]
fn zero_workers_is_rejected() {
    let scheduler = scheduler(BatchConfig::default(), FakeExtractor::new());
    assert!(matches!(
        scheduler.run(0),
        Err(BatchError::InvalidConfig { .. })
    ));
}

#[test]
fn empty_queue_yields_empty_summary() {
    let scheduler = scheduler(BatchConfig::default(), FakeExtractor::new());
    let summary = scheduler.run(2).expect("run");
    assert_eq!(summary.total, 0);
    assert_eq!(summary.success_rate(), 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn ids_are_a_permutation_and_queue_drains(count in 0usize..10, workers in 1usize..5) {
        let (_dir, sources) = papers(count, &[]);
        let scheduler = scheduler(BatchConfig::default(), FakeExtractor::new());
        let assigned = scheduler.enqueue_all(sources);
        prop_assert_eq!(assigned, (0..count as u64).collect::<Vec<_>>());

        let summary = scheduler.run(workers).expect("run");
        let ids: Vec<u64> = summary.jobs.iter().map(|job| job.id).collect();
        prop_assert_eq!(ids, (0..count as u64).collect::<Vec<_>>());
        prop_assert!(summary.jobs.iter().all(Job::is_terminal));
        prop_assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn dispatched_and_skipped_ids_cover_the_queue(count in 1usize..10, batch in 1usize..4) {
        let (_dir, sources) = papers(count, &[]);
        let config = BatchConfig::default().with_sub_batch_size(Some(batch));
        let scheduler = scheduler(config, FakeExtractor::new())
            .with_checkpoint(Box::new(|_: &BatchProgress| false));
        scheduler.enqueue_all(sources);

        let summary = scheduler.run(2).expect("run");
        let mut ids: Vec<u64> = summary
            .jobs
            .iter()
            .chain(&summary.skipped)
            .map(|job| job.id)
            .collect();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..count as u64).collect::<Vec<_>>());
        prop_assert_eq!(summary.total, count);
        prop_assert_eq!(summary.jobs.len(), batch.min(count));
    }
}
