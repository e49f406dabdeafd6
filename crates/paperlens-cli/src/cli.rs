//! CLI argument definitions for the paper analyzer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use paperlens_report::Locale;

#[derive(Parser)]
#[command(
    name = "paperlens",
    version,
    about = "Analyze academic papers for code availability and claimed contributions",
    long_about = "Analyze academic PDF papers with pattern rules.\n\n\
                  Extracts title, authors, and institutions, classifies whether an\n\
                  official code release exists, and collects novelty and improvement\n\
                  claims. Batches run on a worker pool with retries."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a single PDF and print its report.
    Analyze(AnalyzeArgs),

    /// Analyze every PDF in a directory.
    Batch(BatchArgs),

    /// Show or validate the active pattern rules.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to the PDF file.
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    /// Rule file (TOML or JSON) replacing the built-in rules.
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Report language.
    #[arg(long = "locale", value_enum, default_value = "en")]
    pub locale: LocaleArg,

    /// Also write the JSON record and Markdown report under this directory.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the sizes of the detected paper sections.
    #[arg(long = "sections")]
    pub sections: bool,
}

#[derive(Parser)]
pub struct BatchArgs {
    /// Directory containing the PDF files.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Batch configuration file (TOML). Flags override its values.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rule file (TOML or JSON) replacing the built-in rules.
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Number of parallel workers.
    #[arg(long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Additional attempts for a failed document.
    #[arg(long = "max-retries", value_name = "N")]
    pub max_retries: Option<u32>,

    /// Abort the whole batch on the first failed document.
    #[arg(long = "stop-on-error")]
    pub stop_on_error: bool,

    /// Keep extracted and normalized text next to each report.
    #[arg(long = "save-intermediate")]
    pub save_intermediate: bool,

    /// Output directory (default: <DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report language.
    #[arg(long = "locale", value_enum)]
    pub locale: Option<LocaleArg>,

    /// Pause after every N documents.
    #[arg(long = "sub-batch-size", value_name = "N")]
    pub sub_batch_size: Option<usize>,

    /// Ask on stdin whether to continue after each sub-batch.
    #[arg(long = "interactive")]
    pub interactive: bool,

    /// Analyze and summarize without writing any files.
    #[arg(long = "no-outputs")]
    pub no_outputs: bool,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Rule file (TOML or JSON) to validate and show instead of the built-in rules.
    #[arg(long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Print the rules as TOML instead of a table.
    #[arg(long = "dump")]
    pub dump: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LocaleArg {
    En,
    Zh,
}

impl From<LocaleArg> for Locale {
    fn from(value: LocaleArg) -> Self {
        match value {
            LocaleArg::En => Locale::En,
            LocaleArg::Zh => Locale::Zh,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
