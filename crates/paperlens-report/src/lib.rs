//! Analysis report assembly and rendering.
//!
//! Per-paper reports combine the metadata, implementation verdict, and
//! innovation findings into one record and a Markdown document. Batch
//! reports summarise a whole scheduler run. Rendering never aborts the
//! pipeline: a formatting failure degrades to a minimal error report.

pub mod batch;
pub mod locale;
pub mod output;
pub mod paper;

pub use batch::{render_batch_markdown, truncate_chars};
pub use locale::{Labels, Locale};
pub use output::{
    IntermediateText, OutputError, paper_dir_name, write_batch_outputs, write_paper_outputs,
};
pub use paper::{PaperReport, ReportBuilder, fallback_report};
