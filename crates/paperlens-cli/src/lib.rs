//! CLI library components for the paper analyzer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod progress;
pub mod summary;
pub mod types;
