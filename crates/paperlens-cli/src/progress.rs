//! Terminal progress and the interactive sub-batch prompt.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::warn;

use paperlens_batch::{BatchObserver, BatchProgress, Checkpoint};
use paperlens_model::{Job, JobStatus};

/// Drives a progress bar from scheduler events.
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            make_progress_bar()
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    /// Handle for collaborators that print while the bar is drawn.
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }

    pub fn finish(&self, summary: &str) {
        self.bar.finish_with_message(summary.to_string());
    }
}

impl BatchObserver for ProgressObserver {
    fn batch_started(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message("starting");
    }

    fn job_started(&self, job: &Job) {
        self.bar.set_message(format!("analyzing {}", job.document.title));
    }

    fn job_finished(&self, job: &Job) {
        if job.status == JobStatus::Failed {
            self.bar.println(format!(
                "failed: {} ({})",
                job.document.title,
                job.error.as_deref().unwrap_or("unknown error")
            ));
        }
        self.bar.inc(1);
    }

    fn sub_batch_finished(&self, progress: &BatchProgress) {
        self.bar
            .set_message(format!("sub-batch {} done", progress.sub_batch));
    }
}

fn make_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} papers ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Asks on stdin whether to dispatch the next sub-batch.
pub struct StdinCheckpoint {
    bar: ProgressBar,
}

impl StdinCheckpoint {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl Checkpoint for StdinCheckpoint {
    fn should_continue(&self, progress: &BatchProgress) -> bool {
        self.bar.suspend(|| {
            if let Err(error) = write_prompt(&mut io::stderr(), progress) {
                warn!(%error, "failed to write checkpoint prompt");
            }
            let mut answer = String::new();
            match io::stdin().lock().read_line(&mut answer) {
                Ok(0) => false,
                Ok(_) => accepts(&answer),
                Err(error) => {
                    warn!(%error, "failed to read checkpoint answer");
                    false
                }
            }
        })
    }
}

fn write_prompt(out: &mut impl Write, progress: &BatchProgress) -> io::Result<()> {
    write!(
        out,
        "Sub-batch {}: {} done ({} succeeded, {} failed), {} remaining. Continue? [Y/n] ",
        progress.sub_batch,
        progress.completed,
        progress.succeeded,
        progress.failed,
        progress.remaining
    )?;
    out.flush()
}

/// An empty answer or any form of "yes" continues.
pub fn accepts(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    matches!(answer.as_str(), "" | "y" | "yes")
}
