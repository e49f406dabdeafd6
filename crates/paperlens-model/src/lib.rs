//! Shared data model for the paper analysis pipeline.

pub mod analysis;
pub mod error;
pub mod job;
pub mod summary;

pub use analysis::{
    Confidence, ImplementationKind, ImplementationVerdict, InnovationFindings, PaperAnalysis,
    PaperInfo,
};
pub use error::{JobError, Result};
pub use job::{DocumentSource, Job, JobStatus, StepName, StepRecord, StepStatus};
pub use summary::{BatchSummary, FailedJob, KindStats};
