//! Worker pool over a shared FIFO job queue.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use chrono::Utc;
use tracing::{error, info, info_span, warn};

use paperlens_ingest::TextExtractor;
use paperlens_model::{BatchSummary, DocumentSource, Job, JobError, JobStatus};
use paperlens_rules::RuleSet;

use crate::config::BatchConfig;
use crate::error::{BatchError, Result};
use crate::observer::{AlwaysContinue, BatchObserver, BatchProgress, Checkpoint, NoopObserver};
use crate::pipeline::{Pipeline, PipelineOutput};

/// Queues documents and runs them through the pipeline on a fixed pool of
/// worker threads.
///
/// Job ids are handed out at enqueue time under the queue lock, so FIFO
/// order and id order agree. Completion order is not guaranteed.
pub struct TaskScheduler {
    config: BatchConfig,
    pipeline: Pipeline,
    queue: Mutex<VecDeque<Job>>,
    next_id: AtomicU64,
    observer: Arc<dyn BatchObserver>,
    checkpoint: Box<dyn Checkpoint>,
}

/// Shared state of one dispatch round.
struct Round {
    queue: Mutex<VecDeque<Job>>,
    results: Mutex<Vec<Job>>,
    abort: Mutex<Option<(u64, JobError)>>,
}

impl TaskScheduler {
    pub fn new(
        config: BatchConfig,
        rules: Arc<RuleSet>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pipeline: Pipeline::new(&config, rules, extractor),
            config,
            queue: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(0),
            observer: Arc::new(NoopObserver),
            checkpoint: Box::new(AlwaysContinue),
        })
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_checkpoint(mut self, checkpoint: Box<dyn Checkpoint>) -> Self {
        self.checkpoint = checkpoint;
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Adds a document to the queue and returns its job id.
    pub fn enqueue(&self, document: DocumentSource) -> u64 {
        let mut queue = lock(&self.queue);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        queue.push_back(Job::new(id, document));
        id
    }

    pub fn enqueue_all(&self, documents: impl IntoIterator<Item = DocumentSource>) -> Vec<u64> {
        documents
            .into_iter()
            .map(|document| self.enqueue(document))
            .collect()
    }

    /// Number of jobs waiting for dispatch.
    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Drains the queue with `worker_count` workers and aggregates the
    /// outcome.
    ///
    /// Blocks until every dispatched job is terminal. Jobs left undispatched
    /// because the checkpoint declined or the run aborted are reported as
    /// skipped. The queue is empty afterwards in every case.
    pub fn run(&self, worker_count: usize) -> Result<BatchSummary> {
        if worker_count == 0 {
            return Err(BatchError::InvalidConfig {
                message: "worker_count must be at least 1".to_string(),
            });
        }
        let started_at = Utc::now();
        let total = self.pending();
        let _span = info_span!("batch", total, worker_count).entered();
        info!("batch started");
        self.observer.batch_started(total);

        let mut finished: Vec<Job> = Vec::new();
        let mut skipped: Vec<Job> = Vec::new();
        let mut aborted: Option<(u64, JobError)> = None;
        let mut sub_batch = 0;

        loop {
            let batch = self.take_round();
            if batch.is_empty() {
                break;
            }
            sub_batch += 1;
            let round = Round {
                queue: Mutex::new(batch),
                results: Mutex::new(Vec::new()),
                abort: Mutex::new(None),
            };
            self.dispatch(&round, worker_count);

            finished.extend(into_inner(round.results));
            let abort = into_inner(round.abort);
            skipped.extend(
                into_inner(round.queue)
                    .into_iter()
                    .map(|job| skip(job, SKIP_ABORTED)),
            );
            if let Some(failure) = abort {
                aborted = Some(failure);
                break;
            }

            let progress = self.progress(sub_batch, &finished);
            self.observer.sub_batch_finished(&progress);
            if self.config.sub_batch_size.is_some() && progress.remaining > 0 {
                info!(
                    sub_batch,
                    completed = progress.completed,
                    remaining = progress.remaining,
                    "sub-batch finished"
                );
                if !self.checkpoint.should_continue(&progress) {
                    warn!(remaining = progress.remaining, "dispatch stopped at checkpoint");
                    break;
                }
            }
        }

        let reason = if aborted.is_some() {
            SKIP_ABORTED
        } else {
            SKIP_CHECKPOINT
        };
        skipped.extend(lock(&self.queue).drain(..).map(|job| skip(job, reason)));
        let summary = BatchSummary::from_jobs(finished, skipped, started_at, Utc::now());
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped.len(),
            duration_ms = summary.total_duration_ms(),
            "batch finished"
        );

        match aborted {
            Some((job_id, source)) => Err(BatchError::Aborted {
                job_id,
                source,
                summary: Box::new(summary),
            }),
            None => Ok(summary),
        }
    }

    fn take_round(&self) -> VecDeque<Job> {
        let mut queue = lock(&self.queue);
        let size = self
            .config
            .sub_batch_size
            .map_or(queue.len(), |size| size.min(queue.len()));
        queue.drain(..size).collect()
    }

    fn dispatch(&self, round: &Round, worker_count: usize) {
        let workers = worker_count.min(lock(&round.queue).len()).max(1);
        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker_id| scope.spawn(move || self.work(round, worker_id)))
                .collect();
            for (worker_id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    error!(worker_id, "worker thread panicked");
                }
            }
        });
    }

    fn work(&self, round: &Round, worker_id: usize) {
        loop {
            if lock(&round.abort).is_some() {
                break;
            }
            let Some(job) = lock(&round.queue).pop_front() else {
                break;
            };
            let (job, failure) = self.process(job, worker_id);
            if let Some(error) = failure
                && !self.config.continue_on_error
            {
                let mut abort = lock(&round.abort);
                if abort.is_none() {
                    *abort = Some((job.id, error));
                }
            }
            lock(&round.results).push(job);
        }
    }

    /// Runs all attempts of one job and leaves it terminal.
    fn process(&self, mut job: Job, worker_id: usize) -> (Job, Option<JobError>) {
        let _span = info_span!(
            "job",
            job_id = job.id,
            worker_id,
            document = %job.document.title
        )
        .entered();
        job.start(Utc::now());
        self.observer.job_started(&job);

        let max_attempts = self.config.max_attempts();
        let outcome = loop {
            let attempt = job.begin_attempt();
            match self.run_attempt(&mut job, attempt) {
                Ok(output) => break Ok(output),
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    warn!(attempt, max_attempts, %error, "attempt failed, retrying");
                }
                Err(error) => break Err(error),
            }
        };

        let failure = match outcome {
            Ok(output) => {
                job.outputs = output.outputs;
                let implementation = &output.analysis.implementation;
                info!(
                    kind = %implementation.kind,
                    confidence = %implementation.confidence,
                    attempts = job.attempts,
                    "job succeeded"
                );
                job.succeed(output.analysis, Utc::now());
                None
            }
            Err(error) => {
                job.fail(&error, Utc::now());
                if self.config.continue_on_error {
                    warn!(%error, attempts = job.attempts, "job failed, continuing");
                } else {
                    error!(%error, attempts = job.attempts, "job failed, stopping batch");
                }
                Some(error)
            }
        };
        if let Some(duration_ms) = job.duration_ms() {
            info!(duration_ms, status = %job.status, "job finished");
        }
        self.observer.job_finished(&job);
        (job, failure)
    }

    /// One pipeline attempt; a panic fails the attempt instead of the worker.
    fn run_attempt(
        &self,
        job: &mut Job,
        attempt: u32,
    ) -> std::result::Result<PipelineOutput, JobError> {
        let path = job.document.path.clone();
        panic::catch_unwind(AssertUnwindSafe(|| self.pipeline.run(job, attempt))).unwrap_or_else(
            |_| {
                error!(attempt, "pipeline panicked");
                Err(JobError::Extraction {
                    path,
                    message: "worker panicked".to_string(),
                })
            },
        )
    }

    fn progress(&self, sub_batch: usize, finished: &[Job]) -> BatchProgress {
        let succeeded = finished
            .iter()
            .filter(|job| job.status == JobStatus::Success)
            .count();
        BatchProgress {
            sub_batch,
            completed: finished.len(),
            remaining: self.pending(),
            succeeded,
            failed: finished.len() - succeeded,
        }
    }
}

const SKIP_ABORTED: &str = "run aborted";
const SKIP_CHECKPOINT: &str = "stopped at checkpoint";

fn skip(mut job: Job, reason: &str) -> Job {
    job.skip(reason);
    job
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn into_inner<T>(mutex: Mutex<T>) -> T {
    mutex.into_inner().unwrap_or_else(PoisonError::into_inner)
}
