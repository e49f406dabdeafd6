//! Batch-level Markdown report.

use std::fmt::{self, Write};

use tracing::error;

use paperlens_model::{BatchSummary, DocumentSource, ImplementationKind, Job, JobStatus};

use crate::locale::{Labels, Locale};
use crate::paper::{TIMESTAMP_FORMAT, fallback_report};

const EVIDENCE_PREVIEW_CHARS: usize = 100;
const EVIDENCE_PREVIEW_COUNT: usize = 2;

/// Renders the run overview, statistics, per-document table, and failure
/// catalogue.
pub fn render_batch_markdown(summary: &BatchSummary, locale: Locale) -> String {
    let mut out = String::new();
    match write_batch(&mut out, summary, locale) {
        Ok(()) => out,
        Err(err) => {
            error!("batch report rendering failed");
            fallback_report(locale, &err.to_string())
        }
    }
}

fn write_batch(out: &mut String, summary: &BatchSummary, locale: Locale) -> fmt::Result {
    let labels = locale.labels();
    let sep = labels.separator;

    writeln!(out, "# {}", labels.batch_title)?;
    writeln!(out)?;
    writeln!(out, "## {}", labels.overview)?;
    writeln!(out, "- {}{sep}{}", labels.total, summary.total)?;
    writeln!(out, "- {}{sep}{}", labels.succeeded, summary.succeeded)?;
    writeln!(out, "- {}{sep}{}", labels.failed, summary.failed)?;
    if !summary.skipped.is_empty() {
        writeln!(out, "- {}{sep}{}", labels.skipped, summary.skipped.len())?;
    }
    writeln!(out, "- {}{sep}{:.1}%", labels.success_rate, summary.success_rate())?;
    writeln!(out)?;

    writeln!(out, "## {}", labels.timing)?;
    writeln!(
        out,
        "- {}{sep}{}",
        labels.started,
        summary.started_at.format(TIMESTAMP_FORMAT)
    )?;
    writeln!(
        out,
        "- {}{sep}{}",
        labels.finished,
        summary.finished_at.format(TIMESTAMP_FORMAT)
    )?;
    writeln!(
        out,
        "- {}{sep}{}",
        labels.total_duration,
        format_seconds(summary.total_duration_ms() as f64)
    )?;
    let average = summary
        .average_duration_ms()
        .map_or_else(|| "-".to_string(), format_seconds);
    writeln!(out, "- {}{sep}{average}", labels.average_duration)?;
    writeln!(out)?;

    let stats = summary.kind_stats();
    writeln!(out, "## {}", labels.kind_stats)?;
    for kind in ImplementationKind::ALL {
        writeln!(
            out,
            "- {}{sep}{} ({:.1}%)",
            locale.kind(kind),
            stats.count(kind),
            stats.percentage(kind)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## {}", labels.documents)?;
    writeln!(out)?;
    writeln!(
        out,
        "| {} | {} | {} | {} | {} | {} | {} |",
        labels.title,
        labels.size_mb,
        labels.modified,
        labels.kind,
        labels.confidence,
        labels.code_link,
        labels.evidence
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for job in &summary.jobs {
        write_job_row(out, job, locale)?;
    }
    for job in &summary.skipped {
        write_document_row(out, &job.document, labels.skipped, "-", "-", "-")?;
    }

    let failures = summary.failures();
    if !failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "## {}", labels.failures)?;
        for failure in failures {
            writeln!(
                out,
                "- {} ({}){sep}{} [{}{sep}{}]",
                failure.document,
                failure.path.display(),
                failure.error,
                labels.attempts,
                failure.attempts
            )?;
        }
    }
    Ok(())
}

fn write_job_row(out: &mut String, job: &Job, locale: Locale) -> fmt::Result {
    let labels: &Labels = locale.labels();
    match (&job.status, &job.analysis) {
        (JobStatus::Success, Some(analysis)) => {
            let implementation = &analysis.implementation;
            let evidence = implementation
                .evidence
                .iter()
                .take(EVIDENCE_PREVIEW_COUNT)
                .map(|item| truncate_chars(item, EVIDENCE_PREVIEW_CHARS))
                .collect::<Vec<_>>()
                .join("; ");
            write_document_row(
                out,
                &job.document,
                locale.kind(implementation.kind),
                locale.confidence(implementation.confidence),
                implementation.code_url.as_deref().unwrap_or("-"),
                if evidence.is_empty() { "-" } else { &evidence },
            )
        }
        _ => write_document_row(
            out,
            &job.document,
            labels.failed,
            "-",
            "-",
            job.error.as_deref().unwrap_or("-"),
        ),
    }
}

fn write_document_row(
    out: &mut String,
    document: &DocumentSource,
    kind: &str,
    confidence: &str,
    code_url: &str,
    detail: &str,
) -> fmt::Result {
    let size = document
        .size_mb()
        .map_or_else(|| "-".to_string(), |mb| format!("{mb:.2}"));
    let modified = document
        .modified
        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
    writeln!(
        out,
        "| {} | {size} | {modified} | {kind} | {confidence} | {} | {} |",
        table_cell(&document.title),
        table_cell(code_url),
        table_cell(detail)
    )
}

fn format_seconds(ms: f64) -> String {
    format!("{:.2}s", ms / 1000.0)
}

fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Keeps at most `limit` characters, marking the cut with `...`.
pub fn truncate_chars(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
