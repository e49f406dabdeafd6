//! Hooks into a running batch.

use paperlens_model::Job;

/// Counters at a sub-batch boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based number of the sub-batch that just finished.
    pub sub_batch: usize,
    pub completed: usize,
    pub remaining: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Receives job lifecycle events from worker threads.
///
/// Calls arrive concurrently from every worker.
pub trait BatchObserver: Send + Sync {
    fn batch_started(&self, _total: usize) {}

    fn job_started(&self, _job: &Job) {}

    fn job_finished(&self, _job: &Job) {}

    fn sub_batch_finished(&self, _progress: &BatchProgress) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Gate asked between sub-batches whether dispatch should go on.
///
/// Called on the thread that invoked `run`, after all workers of the
/// sub-batch have finished.
pub trait Checkpoint: Send + Sync {
    fn should_continue(&self, progress: &BatchProgress) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysContinue;

impl Checkpoint for AlwaysContinue {
    fn should_continue(&self, _progress: &BatchProgress) -> bool {
        true
    }
}

impl<F> Checkpoint for F
where
    F: Fn(&BatchProgress) -> bool + Send + Sync,
{
    fn should_continue(&self, progress: &BatchProgress) -> bool {
        self(progress)
    }
}
