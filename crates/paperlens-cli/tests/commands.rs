//! Integration tests for the CLI commands.

use std::fs;

use clap::Parser;

use paperlens_cli::cli::{BatchArgs, Cli, Command};
use paperlens_cli::commands::{batch_config, load_rules, run_batch};
use paperlens_model::JobStatus;
use paperlens_report::Locale;

fn batch_args(args: &[&str]) -> BatchArgs {
    let mut argv = vec!["paperlens", "batch"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).expect("parse args").command {
        Command::Batch(args) => args,
        _ => panic!("expected batch command"),
    }
}

#[test]
fn flags_build_the_batch_config() {
    let args = batch_args(&[
        "papers",
        "--workers",
        "4",
        "--stop-on-error",
        "--locale",
        "zh",
        "--output-dir",
        "out",
    ]);
    let config = batch_config(&args).expect("config");
    insta::assert_snapshot!(toml::to_string(&config).expect("serialize"), @r#"
    worker_count = 4
    max_retries = 1
    continue_on_error = false
    save_intermediate = false
    output_dir = "out"
    locale = "zh"
    write_outputs = true
    "#);
}

#[test]
fn flags_override_the_config_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("batch.toml");
    fs::write(
        &path,
        "worker_count = 8\nmax_retries = 3\nlocale = \"zh\"\nsub_batch_size = 10\n",
    )
    .expect("write config");
    let config_arg = path.to_string_lossy().into_owned();
    let args = batch_args(&["papers", "--config", &config_arg, "--max-retries", "0"]);

    let config = batch_config(&args).expect("config");
    assert_eq!(config.worker_count, 8);
    assert_eq!(config.max_retries, 0);
    assert_eq!(config.locale, Locale::Zh);
    assert_eq!(config.sub_batch_size, Some(10));
    assert_eq!(config.output_dir.as_deref(), Some(std::path::Path::new("papers/output")));
}

#[test]
fn zero_workers_are_rejected() {
    let args = batch_args(&["papers", "--workers", "0"]);
    assert!(batch_config(&args).is_err());
}

#[test]
fn unreadable_pdf_fails_its_job_and_writes_reports() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("broken.pdf"), b"not a pdf at all").expect("write pdf");
    let dir_arg = dir.path().to_string_lossy().into_owned();
    let args = batch_args(&[&dir_arg, "--workers", "1"]);

    let outcome = run_batch(&args).expect("run batch");
    assert!(outcome.has_errors());
    assert!(outcome.aborted.is_none());
    let job = &outcome.summary.jobs[0];
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_kind.as_deref(), Some("extraction"));
    assert_eq!(job.attempts, 2);

    let output = dir.path().join("output");
    assert!(output.join("batch_results.json").is_file());
    let report = fs::read_to_string(output.join("batch_report.md")).expect("read report");
    assert!(report.contains("broken"));
}

#[test]
fn stop_on_error_reports_the_abort() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("a.pdf"), b"garbage").expect("write pdf");
    fs::write(dir.path().join("b.pdf"), b"garbage").expect("write pdf");
    let dir_arg = dir.path().to_string_lossy().into_owned();
    let args = batch_args(&[
        &dir_arg,
        "--workers",
        "1",
        "--max-retries",
        "0",
        "--stop-on-error",
        "--no-outputs",
    ]);

    let outcome = run_batch(&args).expect("run batch");
    assert!(outcome.aborted.as_deref().is_some_and(|reason| reason.starts_with("job 0 failed")));
    assert_eq!(outcome.summary.skipped.len(), 1);
    assert!(outcome.report_files.is_empty());
    assert!(!dir.path().join("output").exists());
}

#[test]
fn empty_directory_yields_empty_summary() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dir_arg = dir.path().to_string_lossy().into_owned();
    let outcome = run_batch(&batch_args(&[&dir_arg])).expect("run batch");
    assert_eq!(outcome.summary.total, 0);
    assert!(!outcome.has_errors());
    assert_eq!(outcome.report_files.len(), 2);
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing").to_string_lossy().into_owned();
    assert!(run_batch(&batch_args(&[&missing])).is_err());
}

#[test]
fn invalid_rule_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("rules.toml");
    fs::write(&path, "[categories.official]\npatterns = [\"(unclosed\"]\n").expect("write rules");
    let error = load_rules(Some(&path)).expect_err("invalid rules");
    assert!(format!("{error:#}").contains("load rules from"));
}
