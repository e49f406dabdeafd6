//! Batch execution of the paper analysis pipeline.
//!
//! [`TaskScheduler`] owns a FIFO queue of jobs and drains it with a fixed
//! pool of worker threads. Each job runs the [`Pipeline`] step sequence
//! with bounded retries; outcomes are collected and aggregated into a
//! [`BatchSummary`](paperlens_model::BatchSummary) once all workers join.

pub mod config;
pub mod error;
pub mod observer;
pub mod pipeline;
pub mod scheduler;

pub use config::BatchConfig;
pub use error::{BatchError, Result};
pub use observer::{AlwaysContinue, BatchObserver, BatchProgress, Checkpoint, NoopObserver};
pub use pipeline::{Pipeline, PipelineOutput};
pub use scheduler::TaskScheduler;
